//! Order store over document collections.

use async_trait::async_trait;
use chrono::Utc;

use plaza_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use super::DocumentStore;
use crate::models::{Order, OrderItem, order::total_of};
use crate::store::{OrderStore, StoreError};

#[async_trait]
impl OrderStore for DocumentStore {
    async fn checkout(&self, user: UserId, address: Option<String>) -> Result<Order, StoreError> {
        // Both collections stay write-locked for the whole checkout, so
        // stock checks, decrements and cart consumption are atomic.
        let mut products = self.products.write();
        let mut cart = self.cart_items.write();

        let line_ids: Vec<i64> = cart
            .iter()
            .filter(|(_, c)| c.user_id == user)
            .map(|(id, _)| *id)
            .collect();

        if line_ids.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        // Validate every line before mutating anything.
        for line_id in &line_ids {
            let Some(line) = cart.get(line_id) else {
                continue;
            };
            let product = products
                .get(&line.product_id.as_i64())
                .ok_or(StoreError::NotFound)?;
            if product.stock_quantity < line.quantity {
                return Err(StoreError::InsufficientStock {
                    product: product.id,
                });
            }
        }

        let mut items = Vec::with_capacity(line_ids.len());
        for line_id in &line_ids {
            let Some(line) = cart.remove(line_id) else {
                continue;
            };
            if let Some(product) = products.get_mut(&line.product_id.as_i64()) {
                product.stock_quantity -= line.quantity;
                items.push(OrderItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity: line.quantity,
                });
            }
        }

        let total_price = total_of(&items);

        Ok(self.orders.insert_with(|id| Order {
            id: OrderId::new(id),
            user_id: user,
            items: items.clone(),
            total_price,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            address: address.clone(),
            created_at: Utc::now(),
        }))
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.find(|o| o.user_id == user))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.get(id.as_i64()))
    }

    async fn set_status(&self, id: OrderId, next: OrderStatus) -> Result<Order, StoreError> {
        self.orders
            .update_with(id.as_i64(), |order| {
                if !order.status.can_transition_to(next) {
                    return Err(StoreError::InvalidTransition {
                        from: order.status.to_string(),
                        to: next.to_string(),
                    });
                }
                order.status = next;
                Ok(order.clone())
            })
            .ok_or(StoreError::NotFound)?
    }

    async fn set_payment_status(
        &self,
        id: OrderId,
        next: PaymentStatus,
    ) -> Result<Order, StoreError> {
        self.orders
            .update_with(id.as_i64(), |order| {
                // A delivered order is immutable in every respect.
                if order.status == OrderStatus::Delivered
                    || !order.payment_status.can_transition_to(next)
                {
                    return Err(StoreError::InvalidTransition {
                        from: order.payment_status.to_string(),
                        to: next.to_string(),
                    });
                }
                order.payment_status = next;
                Ok(order.clone())
            })
            .ok_or(StoreError::NotFound)?
    }
}
