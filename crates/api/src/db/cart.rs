//! Cart store over SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

use plaza_core::{CartItemId, ProductId, UserId};

use super::RelationalStore;
use crate::models::CartItem;
use crate::store::{CartStore, StoreError};

fn cart_item_from_row(row: &SqliteRow) -> Result<CartItem, StoreError> {
    let date_added: DateTime<Utc> = row.try_get("date_added")?;

    Ok(CartItem {
        id: CartItemId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        quantity: row.try_get("quantity")?,
        date_added,
    })
}

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, date_added";

#[async_trait]
impl CartStore for RelationalStore {
    async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        let product_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = ?")
                .bind(product.as_i64())
                .fetch_one(&self.pool)
                .await?;
        if product_exists == 0 {
            return Err(StoreError::NotFound);
        }

        // Upsert: one line per (user, product), repeated adds merge.
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, date_added)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id, product_id)
             DO UPDATE SET quantity = quantity + excluded.quantity",
        )
        .bind(user.as_i64())
        .bind(product.as_i64())
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(&format!(
            "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ? AND product_id = ?"
        ))
        .bind(user.as_i64())
        .bind(product.as_i64())
        .fetch_one(&self.pool)
        .await?;

        cart_item_from_row(&row)
    }

    async fn items_for_user(&self, user: UserId) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ? ORDER BY id"
        ))
        .bind(user.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(cart_item_from_row).collect()
    }

    async fn update_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = ? WHERE id = ? AND user_id = ?",
        )
        .bind(quantity)
        .bind(item.as_i64())
        .bind(user.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query(&format!("SELECT {CART_COLUMNS} FROM cart_items WHERE id = ?"))
            .bind(item.as_i64())
            .fetch_one(&self.pool)
            .await?;

        cart_item_from_row(&row)
    }

    async fn remove_item(&self, user: UserId, item: CartItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
            .bind(item.as_i64())
            .bind(user.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self, user: UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
