//! Storage contracts.
//!
//! The API layer talks to storage exclusively through these traits.
//! Two backends implement them — [`crate::db::RelationalStore`] (sqlx /
//! SQLite) and [`crate::docstore::DocumentStore`] (embedded document
//! collections) — and the contract test suite runs identically against
//! both. [`ActivityStore`] is the exception: the ancillary activity
//! collections only exist in the document variant.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use plaza_core::{
    CartItemId, CategoryId, OrderId, OrderStatus, PaymentStatus, ProductId, UserId, UserRole,
    Username,
};

use crate::models::{
    AdminLogEntry, BrowsingEvent, CartItem, Category, ErrorLogEntry, NewCategory, NewProduct,
    NewUser, Notification, Order, Product, ProductUpdate, User, WishlistEntry,
};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username or email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Checkout attempted with no items in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A stock decrement would have driven stock below zero.
    #[error("insufficient stock for product {product}")]
    InsufficientStock {
        /// Product whose stock could not cover the request.
        product: ProductId,
    },

    /// A status change outside the allowed lifecycle.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },
}

/// Outcome of a category cascade delete.
#[derive(Debug, Clone, Copy)]
pub struct CascadeOutcome {
    /// Number of dependent products deleted along with the category.
    pub products_deleted: u64,
}

/// User accounts and credentials.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Persist a new user.
    ///
    /// Fails with `StoreError::Conflict` if the username or email is
    /// already taken; never creates a second record in that case.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError>;

    /// Fetch a user together with their password hash, for login.
    async fn password_hash_for(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, StoreError>;

    /// Change a user's role (admin operation).
    async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), StoreError>;

    /// Mark a user's account as verified (or not).
    async fn set_verified(&self, id: UserId, verified: bool) -> Result<(), StoreError>;
}

/// Categories and products.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // -- categories ---------------------------------------------------

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Case-insensitive substring match on the category name.
    async fn filter_categories_by_name(&self, name: &str) -> Result<Vec<Category>, StoreError>;

    async fn update_category(
        &self,
        id: CategoryId,
        new: NewCategory,
    ) -> Result<Category, StoreError>;

    /// Delete a category and, explicitly, every product referencing it.
    ///
    /// The cascade is part of the contract: after this returns, no
    /// product holds a dangling reference to `id`.
    async fn delete_category(&self, id: CategoryId) -> Result<CascadeOutcome, StoreError>;

    // -- products -----------------------------------------------------

    /// Persist a new product owned by `producer`.
    ///
    /// Fails with `StoreError::NotFound` if the category reference does
    /// not resolve.
    async fn create_product(
        &self,
        producer: UserId,
        new: NewProduct,
    ) -> Result<Product, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Apply a partial update. Fails with `StoreError::NotFound` if the
    /// product does not exist, or if a changed category reference does
    /// not resolve.
    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    /// Case-insensitive substring match on the product name.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, StoreError>;

    /// Products in the first category whose name matches
    /// (case-insensitive substring). Fails with `StoreError::NotFound`
    /// if no category matches.
    async fn filter_by_category(&self, category_name: &str) -> Result<Vec<Product>, StoreError>;

    /// Products with `min <= price <= max` (inclusive). `None` for
    /// `max` means unbounded.
    async fn filter_by_price_range(
        &self,
        min: Decimal,
        max: Option<Decimal>,
    ) -> Result<Vec<Product>, StoreError>;

    async fn filter_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError>;

    /// Atomically decrement stock by `quantity`.
    ///
    /// The decrement and the `stock >= quantity` check happen as one
    /// per-record operation, so stock never goes negative even under
    /// concurrent checkouts. Fails with `StoreError::InsufficientStock`
    /// when stock cannot cover the request.
    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError>;
}

/// Per-user cart line items.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Add `quantity` of a product to the user's cart.
    ///
    /// If a line for the same (user, product) pair already exists, its
    /// quantity is incremented instead of creating a duplicate. Fails
    /// with `StoreError::NotFound` if the product does not exist.
    async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartItem, StoreError>;

    async fn items_for_user(&self, user: UserId) -> Result<Vec<CartItem>, StoreError>;

    /// Set the quantity of a line item. Fails with
    /// `StoreError::NotFound` if the line does not exist or belongs to
    /// a different user.
    async fn update_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: i64,
    ) -> Result<CartItem, StoreError>;

    /// Remove a line item. Same ownership rule as `update_quantity`.
    async fn remove_item(&self, user: UserId, item: CartItemId) -> Result<(), StoreError>;

    /// Remove every line item for the user.
    async fn clear(&self, user: UserId) -> Result<(), StoreError>;
}

/// Orders and checkout.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create an order from the user's current cart.
    ///
    /// Reads the cart, snapshots each line into an order item at the
    /// product's current price, decrements stock atomically per
    /// product, computes the total as the exact sum of line totals, and
    /// clears the cart. Both statuses start at `pending`.
    ///
    /// Fails with `StoreError::EmptyCart` (creating nothing) when the
    /// cart has no items, and `StoreError::InsufficientStock` when a
    /// product cannot cover its line quantity.
    async fn checkout(&self, user: UserId, address: Option<String>) -> Result<Order, StoreError>;

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Advance the fulfillment status. Fails with
    /// `StoreError::InvalidTransition` for any move outside the
    /// lifecycle.
    async fn set_status(&self, id: OrderId, next: OrderStatus) -> Result<Order, StoreError>;

    /// Advance the payment status. A delivered order is immutable, so
    /// this also fails once fulfillment reached `delivered`.
    async fn set_payment_status(
        &self,
        id: OrderId,
        next: PaymentStatus,
    ) -> Result<Order, StoreError>;
}

/// Append-mostly activity records (document backend only).
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn record_view(&self, user: UserId, product: ProductId) -> Result<(), StoreError>;

    async fn history(&self, user: UserId) -> Result<Vec<BrowsingEvent>, StoreError>;

    /// Add a product to the wishlist; adding it twice is a no-op that
    /// returns the existing entry.
    async fn add_wishlist(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<WishlistEntry, StoreError>;

    async fn remove_wishlist(&self, user: UserId, product: ProductId) -> Result<(), StoreError>;

    async fn wishlist(&self, user: UserId) -> Result<Vec<WishlistEntry>, StoreError>;

    async fn notify(&self, user: UserId, message: &str) -> Result<Notification, StoreError>;

    async fn notifications(&self, user: UserId) -> Result<Vec<Notification>, StoreError>;

    async fn log_admin_action(&self, admin: UserId, action: &str) -> Result<(), StoreError>;

    async fn admin_log(&self) -> Result<Vec<AdminLogEntry>, StoreError>;

    async fn log_error(&self, path: &str, detail: &str) -> Result<(), StoreError>;

    async fn error_log(&self) -> Result<Vec<ErrorLogEntry>, StoreError>;
}
