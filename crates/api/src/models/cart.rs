//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{CartItemId, ProductId, UserId};

/// A line item in a user's cart.
///
/// Belongs to exactly one user; at most one line exists per
/// (user, product) pair — adding the same product again increments the
/// quantity instead.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Always >= 1; a zero-quantity line is removed, not kept.
    pub quantity: i64,
    pub date_added: DateTime<Utc>,
}
