//! Catalog store (categories + products) over SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::{Row, sqlite::SqliteRow};

use plaza_core::{CategoryId, Price, ProductId, UserId};

use super::{RelationalStore, encode_string_list, string_list};
use crate::models::{Category, NewCategory, NewProduct, Product, ProductUpdate};
use crate::store::{CascadeOutcome, CatalogStore, StoreError};

fn category_from_row(row: &SqliteRow) -> Result<Category, StoreError> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let price_cents: i64 = row.try_get("price_cents")?;
    let price = Price::from_cents(price_cents)
        .map_err(|e| StoreError::DataCorruption(format!("invalid price in database: {e}")))?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        image: row.try_get("image")?,
        price,
        description: row.try_get("description")?,
        category_id: CategoryId::new(row.try_get("category_id")?),
        producer_id: UserId::new(row.try_get("producer_id")?),
        stock_quantity: row.try_get("stock_quantity")?,
        available: row.try_get("available")?,
        tags: string_list(row, "tags")?,
        images: string_list(row, "images")?,
        created_at,
    })
}

const PRODUCT_COLUMNS: &str = "id, name, image, price_cents, description, category_id, \
                               producer_id, stock_quantity, available, tags, images, created_at";

/// Escape `LIKE` metacharacters so user input matches literally; every
/// pattern built from this carries `ESCAPE '\'`. The document backend
/// does plain substring matching, so the two must agree on inputs like
/// `"100%"`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inclusive lower bound in cents, rounding up so that e.g. `min=0.005`
/// excludes a 0-cent price it could not have matched anyway.
fn min_cents(min: Decimal) -> i64 {
    (min * Decimal::ONE_HUNDRED).ceil().to_i64().unwrap_or(0)
}

/// Inclusive upper bound in cents, rounding down.
fn max_cents(max: Option<Decimal>) -> i64 {
    max.and_then(|m| (m * Decimal::ONE_HUNDRED).floor().to_i64())
        .unwrap_or(i64::MAX)
}

#[async_trait]
impl CatalogStore for RelationalStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
            .bind(&new.name)
            .bind(&new.description)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id: CategoryId::new(result.last_insert_rowid()),
            name: new.name,
            description: new.description,
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(category_from_row).transpose()
    }

    async fn filter_categories_by_name(&self, name: &str) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query(
            r"SELECT id, name, description FROM categories
              WHERE lower(name) LIKE '%' || lower(?) || '%' ESCAPE '\' ORDER BY id",
        )
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn update_category(
        &self,
        id: CategoryId,
        new: NewCategory,
    ) -> Result<Category, StoreError> {
        let result = sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
            .bind(&new.name)
            .bind(&new.description)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(Category {
            id,
            name: new.name,
            description: new.description,
        })
    }

    async fn delete_category(&self, id: CategoryId) -> Result<CascadeOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Explicit cascade: dependent products go first, in the same
        // transaction as the category row.
        let products = sqlx::query("DELETE FROM products WHERE category_id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let category = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        if category.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        Ok(CascadeOutcome {
            products_deleted: products.rows_affected(),
        })
    }

    async fn create_product(
        &self,
        producer: UserId,
        new: NewProduct,
    ) -> Result<Product, StoreError> {
        let category_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ?")
                .bind(new.category_id.as_i64())
                .fetch_one(&self.pool)
                .await?;
        if category_exists == 0 {
            return Err(StoreError::NotFound);
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO products
             (name, image, price_cents, description, category_id, producer_id,
              stock_quantity, available, tags, images, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.image)
        .bind(new.price.as_cents())
        .bind(&new.description)
        .bind(new.category_id.as_i64())
        .bind(producer.as_i64())
        .bind(new.stock_quantity)
        .bind(new.available)
        .bind(encode_string_list(&new.tags)?)
        .bind(encode_string_list(&new.images)?)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(result.last_insert_rowid()),
            name: new.name,
            image: new.image,
            price: new.price,
            description: new.description,
            category_id: new.category_id,
            producer_id: producer,
            stock_quantity: new.stock_quantity,
            available: new.available,
            tags: new.tags,
            images: new.images,
            created_at,
        })
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        let mut product = self.get_product(id).await?.ok_or(StoreError::NotFound)?;

        if let Some(category_id) = update.category_id
            && category_id != product.category_id
        {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ?")
                    .bind(category_id.as_i64())
                    .fetch_one(&self.pool)
                    .await?;
            if exists == 0 {
                return Err(StoreError::NotFound);
            }
        }

        update.apply_to(&mut product);

        sqlx::query(
            "UPDATE products SET name = ?, image = ?, price_cents = ?, description = ?,
             category_id = ?, stock_quantity = ?, available = ?, tags = ?, images = ?
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.image)
        .bind(product.price.as_cents())
        .bind(&product.description)
        .bind(product.category_id.as_i64())
        .bind(product.stock_quantity)
        .bind(product.available)
        .bind(encode_string_list(&product.tags)?)
        .bind(encode_string_list(&product.images)?)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            r"SELECT {PRODUCT_COLUMNS} FROM products
              WHERE lower(name) LIKE '%' || lower(?) || '%' ESCAPE '\' ORDER BY id"
        ))
        .bind(escape_like(query))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn filter_by_category(&self, category_name: &str) -> Result<Vec<Product>, StoreError> {
        let category = sqlx::query(
            r"SELECT id FROM categories
              WHERE lower(name) LIKE '%' || lower(?) || '%' ESCAPE '\' ORDER BY id LIMIT 1",
        )
        .bind(escape_like(category_name))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let category_id: i64 = category.try_get("id")?;

        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn filter_by_price_range(
        &self,
        min: Decimal,
        max: Option<Decimal>,
    ) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE price_cents >= ? AND price_cents <= ? ORDER BY id"
        ))
        .bind(min_cents(min))
        .bind(max_cents(max))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn filter_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE available = ? ORDER BY id"
        ))
        .bind(available)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError> {
        // Guarded single-statement decrement: the check and the write
        // are one atomic row update, so stock cannot go negative under
        // concurrent checkouts.
        let result = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity - ?
             WHERE id = ? AND stock_quantity >= ?",
        )
        .bind(quantity)
        .bind(id.as_i64())
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            if self.get_product(id).await?.is_none() {
                return Err(StoreError::NotFound);
            }
            return Err(StoreError::InsufficientStock { product: id });
        }
        Ok(())
    }
}
