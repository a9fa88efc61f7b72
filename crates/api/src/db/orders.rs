//! Order store over SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, sqlite::SqliteRow};

use plaza_core::{OrderId, OrderStatus, PaymentStatus, Price, ProductId, UserId};

use super::RelationalStore;
use crate::models::{Order, OrderItem};
use crate::store::{OrderStore, StoreError};

fn order_item_from_row(row: &SqliteRow) -> Result<OrderItem, StoreError> {
    let unit_price_cents: i64 = row.try_get("unit_price_cents")?;
    let unit_price = Price::from_cents(unit_price_cents)
        .map_err(|e| StoreError::DataCorruption(format!("invalid price in database: {e}")))?;

    Ok(OrderItem {
        product_id: ProductId::new(row.try_get("product_id")?),
        name: row.try_get("name")?,
        unit_price,
        quantity: row.try_get("quantity")?,
    })
}

fn order_from_row(row: &SqliteRow, items: Vec<OrderItem>) -> Result<Order, StoreError> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e| StoreError::DataCorruption(format!("invalid order status: {e}")))?;

    let payment_status: String = row.try_get("payment_status")?;
    let payment_status: PaymentStatus = payment_status
        .parse()
        .map_err(|e| StoreError::DataCorruption(format!("invalid payment status: {e}")))?;

    let total_cents: i64 = row.try_get("total_cents")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        items,
        total_price: Decimal::new(total_cents, 2),
        status,
        payment_status,
        address: row.try_get("address")?,
        created_at,
    })
}

const ORDER_COLUMNS: &str = "id, user_id, total_cents, status, payment_status, address, created_at";

impl RelationalStore {
    async fn items_for_order(&self, order: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query(
            "SELECT product_id, name, unit_price_cents, quantity
             FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_item_from_row).collect()
    }
}

#[async_trait]
impl OrderStore for RelationalStore {
    async fn checkout(&self, user: UserId, address: Option<String>) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Snapshot the cart joined with current product data. Price and
        // name are captured here; later product edits do not touch the
        // order.
        let lines = sqlx::query(
            "SELECT c.product_id, c.quantity, p.name, p.price_cents
             FROM cart_items c JOIN products p ON p.id = c.product_id
             WHERE c.user_id = ? ORDER BY c.id",
        )
        .bind(user.as_i64())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product_id = ProductId::new(line.try_get("product_id")?);
            let quantity: i64 = line.try_get("quantity")?;

            // Guarded decrement inside the transaction; a failed line
            // rolls back every decrement made so far.
            let decremented = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - ?
                 WHERE id = ? AND stock_quantity >= ?",
            )
            .bind(quantity)
            .bind(product_id.as_i64())
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(StoreError::InsufficientStock {
                    product: product_id,
                });
            }

            let unit_price_cents: i64 = line.try_get("price_cents")?;
            let unit_price = Price::from_cents(unit_price_cents).map_err(|e| {
                StoreError::DataCorruption(format!("invalid price in database: {e}"))
            })?;

            items.push(OrderItem {
                product_id,
                name: line.try_get("name")?,
                unit_price,
                quantity,
            });
        }

        let total_cents: i64 = items
            .iter()
            .map(|item| item.unit_price.as_cents() * item.quantity)
            .sum();

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO orders (user_id, total_cents, status, payment_status, address, created_at)
             VALUES (?, ?, 'pending', 'pending', ?, ?)",
        )
        .bind(user.as_i64())
        .bind(total_cents)
        .bind(&address)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let order_id = result.last_insert_rowid();

        for item in &items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, name, unit_price_cents, quantity)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id.as_i64())
            .bind(&item.name)
            .bind(item.unit_price.as_cents())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        // The cart is consumed by checkout.
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_id),
            user_id: user,
            items,
            total_price: Decimal::new(total_cents, 2),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            address,
            created_at,
        })
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY id"
        ))
        .bind(user.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = OrderId::new(row.try_get("id")?);
            let items = self.items_for_order(id).await?;
            orders.push(order_from_row(row, items)?);
        }
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for_order(id).await?;
        Ok(Some(order_from_row(&row, items)?))
    }

    async fn set_status(&self, id: OrderId, next: OrderStatus) -> Result<Order, StoreError> {
        let order = self.get_order(id).await?.ok_or(StoreError::NotFound)?;

        if !order.status.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                from: order.status.to_string(),
                to: next.to_string(),
            });
        }

        // Guarded on the status just validated: if a concurrent
        // transition landed first, this updates zero rows instead of
        // applying a second move.
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(next.to_string())
            .bind(id.as_i64())
            .bind(order.status.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let current = self.get_order(id).await?.ok_or(StoreError::NotFound)?;
            return Err(StoreError::InvalidTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        Ok(Order {
            status: next,
            ..order
        })
    }

    async fn set_payment_status(
        &self,
        id: OrderId,
        next: PaymentStatus,
    ) -> Result<Order, StoreError> {
        let order = self.get_order(id).await?.ok_or(StoreError::NotFound)?;

        // A delivered order is immutable in every respect.
        if order.status == OrderStatus::Delivered
            || !order.payment_status.can_transition_to(next)
        {
            return Err(StoreError::InvalidTransition {
                from: order.payment_status.to_string(),
                to: next.to_string(),
            });
        }

        // Same guard as `set_status`: re-checks both the payment status
        // and the delivered lock in the update itself.
        let result = sqlx::query(
            "UPDATE orders SET payment_status = ?
             WHERE id = ? AND payment_status = ? AND status != 'delivered'",
        )
        .bind(next.to_string())
        .bind(id.as_i64())
        .bind(order.payment_status.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_order(id).await?.ok_or(StoreError::NotFound)?;
            return Err(StoreError::InvalidTransition {
                from: current.payment_status.to_string(),
                to: next.to_string(),
            });
        }

        Ok(Order {
            payment_status: next,
            ..order
        })
    }
}
