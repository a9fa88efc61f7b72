//! Cart store over document collections.

use async_trait::async_trait;
use chrono::Utc;

use plaza_core::{CartItemId, ProductId, UserId};

use super::DocumentStore;
use crate::models::CartItem;
use crate::store::{CartStore, StoreError};

#[async_trait]
impl CartStore for DocumentStore {
    async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        if self.products.get(product.as_i64()).is_none() {
            return Err(StoreError::NotFound);
        }

        // Merge into an existing line for the same (user, product).
        if let Some((id, _)) = self
            .cart_items
            .find_one(|c| c.user_id == user && c.product_id == product)
        {
            return self
                .cart_items
                .update_with(id, |c| {
                    c.quantity += quantity;
                    c.clone()
                })
                .ok_or(StoreError::NotFound);
        }

        Ok(self.cart_items.insert_with(|id| CartItem {
            id: CartItemId::new(id),
            user_id: user,
            product_id: product,
            quantity,
            date_added: Utc::now(),
        }))
    }

    async fn items_for_user(&self, user: UserId) -> Result<Vec<CartItem>, StoreError> {
        Ok(self.cart_items.find(|c| c.user_id == user))
    }

    async fn update_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        let owned = self
            .cart_items
            .get(item.as_i64())
            .is_some_and(|c| c.user_id == user);
        if !owned {
            return Err(StoreError::NotFound);
        }

        self.cart_items
            .update_with(item.as_i64(), |c| {
                c.quantity = quantity;
                c.clone()
            })
            .ok_or(StoreError::NotFound)
    }

    async fn remove_item(&self, user: UserId, item: CartItemId) -> Result<(), StoreError> {
        let owned = self
            .cart_items
            .get(item.as_i64())
            .is_some_and(|c| c.user_id == user);
        if !owned {
            return Err(StoreError::NotFound);
        }

        self.cart_items
            .remove(item.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn clear(&self, user: UserId) -> Result<(), StoreError> {
        self.cart_items.remove_where(|c| c.user_id == user);
        Ok(())
    }
}
