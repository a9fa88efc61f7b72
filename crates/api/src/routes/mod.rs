//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store ping)
//!
//! # Auth
//! POST /signup                 - Register a new account
//! POST /token                  - Exchange credentials for tokens
//! POST /token/refresh          - Exchange a refresh token for a new access token
//! GET  /me                     - Current user (requires auth)
//!
//! # Products (reads are public)
//! GET  /products               - Product listing
//! POST /products               - Create product (producer/admin)
//! GET  /products/{id}          - Product detail
//! PUT  /products/{id}          - Update product (owner producer or admin)
//! DELETE /products/{id}        - Delete product (owner producer or admin)
//! GET  /products/search?q=                         - Name substring search
//! GET  /products/filter_by_category?category=      - By category name
//! GET  /products/filter_by_price?min_price=&max_price= - By price range
//! GET  /products/filter_by_availability?available= - By availability flag
//!
//! # Categories (reads are public, writes admin-only)
//! GET  /categories             - Category listing
//! POST /categories             - Create category (admin)
//! GET  /categories/{id}        - Category detail
//! PUT  /categories/{id}        - Update category (admin)
//! DELETE /categories/{id}      - Delete category + its products (admin)
//! GET  /categories/filter_by_name?name= - Name substring filter
//!
//! # Cart (requires auth, caller's cart only)
//! GET  /cart                   - List cart items
//! DELETE /cart                 - Empty the cart
//! POST /cart/items             - Add item (merges duplicate product lines)
//! PUT  /cart/items/{id}        - Set line quantity
//! DELETE /cart/items/{id}      - Remove line
//!
//! # Orders (requires auth)
//! POST /orders/checkout        - Create order from cart
//! GET  /orders                 - Caller's orders
//! GET  /orders/{id}            - Order detail (owner or admin)
//! POST /orders/{id}/status     - Advance fulfillment status (admin)
//! POST /orders/{id}/payment_status - Advance payment status (admin)
//! POST /orders/{id}/cancel     - Cancel own order (pending/paid only)
//!
//! # Account activity (document backend only; 404 otherwise)
//! GET  /account/history        - Browsing history
//! GET  /account/wishlist       - Wishlist
//! POST /account/wishlist       - Add to wishlist
//! DELETE /account/wishlist/{product_id} - Remove from wishlist
//! GET  /account/notifications  - Notifications
//! GET  /admin/logs             - Admin action log (admin)
//! GET  /admin/errors           - Server error log (admin)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Pings the relational pool when that backend is active; the document
/// backend is in-process and always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.pool() {
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::OK,
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/token", post(auth::token))
        .route("/token/refresh", post(auth::refresh))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route("/filter_by_category", get(products::filter_by_category))
        .route("/filter_by_price", get(products::filter_by_price))
        .route(
            "/filter_by_availability",
            get(products::filter_by_availability),
        )
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/filter_by_name", get(categories::filter_by_name))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::remove),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/checkout", post(orders::checkout))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::set_status))
        .route("/{id}/payment_status", post(orders::set_payment_status))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the account activity routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(account::history))
        .route("/wishlist", get(account::wishlist).post(account::add_wishlist))
        .route("/wishlist/{product_id}", delete(account::remove_wishlist))
        .route("/notifications", get(account::notifications))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/account", account_routes())
        .route("/admin/logs", get(account::admin_logs))
        .route("/admin/errors", get(account::error_logs))
}

/// Build the full application router over a state.
///
/// This is everything except the process-level layers (Sentry, trace)
/// that `main` adds; the integration tests drive this router directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::error_log::record_server_errors,
        ))
        .with_state(state)
}
