//! Relational storage backend (sqlx / SQLite).
//!
//! # Tables
//!
//! - `users` - accounts, roles, password hashes
//! - `categories` - product categories
//! - `products` - catalog products (prices stored as integer cents)
//! - `cart_items` - per-user cart lines, unique per (user, product)
//! - `orders` / `order_items` - orders and their line snapshots
//!
//! # Migrations
//!
//! The schema is applied via:
//! ```bash
//! cargo run -p plaza-cli -- migrate
//! ```
//!
//! All queries are runtime-checked (`sqlx::query`), so the crate builds
//! without a live database.

mod cart;
mod catalog;
mod identity;
mod orders;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::store::StoreError;

/// Full relational schema. Idempotent; applied by the CLI `migrate`
/// command and by tests.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'consumer',
    verified      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS products (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    image          TEXT,
    price_cents    INTEGER NOT NULL,
    description    TEXT,
    category_id    INTEGER NOT NULL,
    producer_id    INTEGER NOT NULL,
    stock_quantity INTEGER NOT NULL,
    available      INTEGER NOT NULL DEFAULT 1,
    tags           TEXT NOT NULL DEFAULT '[]',
    images         TEXT NOT NULL DEFAULT '[]',
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id);
CREATE INDEX IF NOT EXISTS idx_products_producer ON products(producer_id);

CREATE TABLE IF NOT EXISTS cart_items (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL,
    product_id INTEGER NOT NULL,
    quantity   INTEGER NOT NULL,
    date_added TEXT NOT NULL,
    UNIQUE(user_id, product_id)
);

CREATE TABLE IF NOT EXISTS orders (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL,
    total_cents    INTEGER NOT NULL,
    status         TEXT NOT NULL DEFAULT 'pending',
    payment_status TEXT NOT NULL DEFAULT 'pending',
    address        TEXT,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS order_items (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id         INTEGER NOT NULL,
    product_id       INTEGER NOT NULL,
    name             TEXT NOT NULL,
    unit_price_cents INTEGER NOT NULL,
    quantity         INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);
";

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options =
        SqliteConnectOptions::from_str(database_url.expose_secret())?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create an in-memory pool with the schema applied.
///
/// A single connection keeps the in-memory database alive and shared;
/// used by the contract test suite.
///
/// # Errors
///
/// Returns `sqlx::Error` if the pool cannot be created or the schema
/// fails to apply.
pub async fn create_in_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    apply_schema(&pool).await?;
    Ok(pool)
}

/// Apply the relational schema. Idempotent.
///
/// # Errors
///
/// Returns `sqlx::Error` if any statement fails.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// The relational storage backend.
///
/// One struct implements every store trait; handlers reach it through
/// `Arc<dyn ...Store>` handles.
#[derive(Clone)]
pub struct RelationalStore {
    pool: SqlitePool,
}

impl RelationalStore {
    /// Create a new relational store over an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool (for readiness checks).
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Decode a JSON-encoded string list column.
fn string_list(row: &SqliteRow, column: &str) -> Result<Vec<String>, StoreError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| StoreError::DataCorruption(format!("invalid {column} in database: {e}")))
}

/// Encode a string list for storage.
fn encode_string_list(list: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(list)
        .map_err(|e| StoreError::DataCorruption(format!("failed to serialize list: {e}")))
}
