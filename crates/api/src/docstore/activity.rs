//! Activity store over document collections.

use async_trait::async_trait;
use chrono::Utc;

use plaza_core::{AdminLogId, ErrorLogId, NotificationId, ProductId, UserId, WishlistEntryId};

use super::DocumentStore;
use crate::models::{AdminLogEntry, BrowsingEvent, ErrorLogEntry, Notification, WishlistEntry};
use crate::store::{ActivityStore, StoreError};

#[async_trait]
impl ActivityStore for DocumentStore {
    async fn record_view(&self, user: UserId, product: ProductId) -> Result<(), StoreError> {
        self.history.insert_with(|_| BrowsingEvent {
            user_id: user,
            product_id: product,
            viewed_at: Utc::now(),
        });
        Ok(())
    }

    async fn history(&self, user: UserId) -> Result<Vec<BrowsingEvent>, StoreError> {
        Ok(self.history.find(|e| e.user_id == user))
    }

    async fn add_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<WishlistEntry, StoreError> {
        // Idempotent: a second add returns the existing entry.
        if let Some((_, entry)) = self
            .wishlists
            .find_one(|e| e.user_id == user && e.product_id == product)
        {
            return Ok(entry);
        }

        Ok(self.wishlists.insert_with(|id| WishlistEntry {
            id: WishlistEntryId::new(id),
            user_id: user,
            product_id: product,
            added_at: Utc::now(),
        }))
    }

    async fn remove_wishlist(&self, user: UserId, product: ProductId) -> Result<(), StoreError> {
        let removed = self
            .wishlists
            .remove_where(|e| e.user_id == user && e.product_id == product);
        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, StoreError> {
        Ok(self.wishlists.find(|e| e.user_id == user))
    }

    async fn notify(&self, user: UserId, message: &str) -> Result<Notification, StoreError> {
        Ok(self.notifications.insert_with(|id| Notification {
            id: NotificationId::new(id),
            user_id: user,
            message: message.to_owned(),
            read: false,
            created_at: Utc::now(),
        }))
    }

    async fn notifications(&self, user: UserId) -> Result<Vec<Notification>, StoreError> {
        Ok(self.notifications.find(|n| n.user_id == user))
    }

    async fn log_admin_action(&self, admin: UserId, action: &str) -> Result<(), StoreError> {
        self.admin_log.insert_with(|id| AdminLogEntry {
            id: AdminLogId::new(id),
            admin_id: admin,
            action: action.to_owned(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn admin_log(&self) -> Result<Vec<AdminLogEntry>, StoreError> {
        Ok(self.admin_log.all())
    }

    async fn log_error(&self, path: &str, detail: &str) -> Result<(), StoreError> {
        self.error_log.insert_with(|id| ErrorLogEntry {
            id: ErrorLogId::new(id),
            path: path.to_owned(),
            detail: detail.to_owned(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn error_log(&self) -> Result<Vec<ErrorLogEntry>, StoreError> {
        Ok(self.error_log.all())
    }
}
