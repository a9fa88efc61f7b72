//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use plaza_core::{OrderId, OrderStatus, PaymentStatus, Price, ProductId, UserId};

/// A line item snapshot inside an order.
///
/// Captured from the cart at checkout time: later price or name edits
/// to the product do not touch existing orders, and the originating
/// cart line is deleted, so a line can never be shared between orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: i64,
}

impl OrderItem {
    /// Line total (`unit_price` x `quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount() * Decimal::from(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    /// Exactly the sum of item line totals at creation time.
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Optional shipping address.
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sum the line totals for a set of order items.
#[must_use]
pub fn total_of(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}
