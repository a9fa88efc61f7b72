//! Catalog store over document collections.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use plaza_core::{CategoryId, ProductId, UserId};

use super::DocumentStore;
use crate::models::{Category, NewCategory, NewProduct, Product, ProductUpdate};
use crate::store::{CascadeOutcome, CatalogStore, StoreError};

fn name_contains(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl CatalogStore for DocumentStore {
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        Ok(self.categories.insert_with(|id| Category {
            id: CategoryId::new(id),
            name: new.name.clone(),
            description: new.description.clone(),
        }))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.all())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.get(id.as_i64()))
    }

    async fn filter_categories_by_name(&self, name: &str) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.find(|c| name_contains(&c.name, name)))
    }

    async fn update_category(
        &self,
        id: CategoryId,
        new: NewCategory,
    ) -> Result<Category, StoreError> {
        self.categories
            .update_with(id.as_i64(), |c| {
                c.name.clone_from(&new.name);
                c.description.clone_from(&new.description);
                c.clone()
            })
            .ok_or(StoreError::NotFound)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<CascadeOutcome, StoreError> {
        self.categories
            .remove(id.as_i64())
            .ok_or(StoreError::NotFound)?;

        // Explicit cascade: the engine enforces no references, so the
        // store removes dependents itself.
        let products_deleted = self.products.remove_where(|p| p.category_id == id);

        Ok(CascadeOutcome { products_deleted })
    }

    async fn create_product(
        &self,
        producer: UserId,
        new: NewProduct,
    ) -> Result<Product, StoreError> {
        if self.categories.get(new.category_id.as_i64()).is_none() {
            return Err(StoreError::NotFound);
        }

        Ok(self.products.insert_with(|id| Product {
            id: ProductId::new(id),
            name: new.name.clone(),
            image: new.image.clone(),
            price: new.price,
            description: new.description.clone(),
            category_id: new.category_id,
            producer_id: producer,
            stock_quantity: new.stock_quantity,
            available: new.available,
            tags: new.tags.clone(),
            images: new.images.clone(),
            created_at: Utc::now(),
        }))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.get(id.as_i64()))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.all())
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        if let Some(category_id) = update.category_id
            && self.categories.get(category_id.as_i64()).is_none()
        {
            return Err(StoreError::NotFound);
        }

        self.products
            .update_with(id.as_i64(), |p| {
                update.apply_to(p);
                p.clone()
            })
            .ok_or(StoreError::NotFound)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.products
            .remove(id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.find(|p| name_contains(&p.name, query)))
    }

    async fn filter_by_category(&self, category_name: &str) -> Result<Vec<Product>, StoreError> {
        let (_, category) = self
            .categories
            .find_one(|c| name_contains(&c.name, category_name))
            .ok_or(StoreError::NotFound)?;

        Ok(self.products.find(|p| p.category_id == category.id))
    }

    async fn filter_by_price_range(
        &self,
        min: Decimal,
        max: Option<Decimal>,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.find(|p| {
            let amount = p.price.amount();
            amount >= min && max.is_none_or(|max| amount <= max)
        }))
    }

    async fn filter_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.find(|p| p.available == available))
    }

    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError> {
        // Check and decrement under the same write lock.
        self.products
            .update_with(id.as_i64(), |p| {
                if p.stock_quantity < quantity {
                    return Err(StoreError::InsufficientStock { product: id });
                }
                p.stock_quantity -= quantity;
                Ok(())
            })
            .ok_or(StoreError::NotFound)?
    }
}
