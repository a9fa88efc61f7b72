//! Append-only activity records.
//!
//! These exist only in the document storage variant, mirroring the
//! ancillary collections of the original system: browsing history,
//! wishlists, user notifications, admin action logs, and error logs.
//! They are created by system events and are not user-editable.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{AdminLogId, ErrorLogId, NotificationId, ProductId, UserId, WishlistEntryId};

/// A product view recorded for a user.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsingEvent {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub viewed_at: DateTime<Utc>,
}

/// A product saved to a user's wishlist.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// A notification delivered to a user.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// An administrative action, for audit.
#[derive(Debug, Clone, Serialize)]
pub struct AdminLogEntry {
    pub id: AdminLogId,
    pub admin_id: UserId,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// A server-side error observed while handling a request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorLogEntry {
    pub id: ErrorLogId,
    pub path: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
