//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{CategoryId, Price, ProductId, UserId};

/// A catalog product (domain type).
///
/// Owned by exactly one producer; references exactly one category.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Primary image reference (URL or path); storage itself is external.
    pub image: Option<String>,
    pub price: Price,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub producer_id: UserId,
    pub stock_quantity: i64,
    pub available: bool,
    pub tags: Vec<String>,
    /// Additional image references.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Errors from validating product input.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProductFieldError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("stock quantity cannot be negative")]
    NegativeStock,
}

/// Validated input form for creating a product.
///
/// `price` is already a [`Price`], so positivity and precision are
/// guaranteed by the type; this constructor covers the remaining
/// record-level checks. Whether `category_id` resolves is the catalog
/// store's job (it owns the category table).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub image: Option<String>,
    pub price: Price,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub stock_quantity: i64,
    pub available: bool,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl NewProduct {
    /// Validate and construct a `NewProduct`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the stock quantity is
    /// negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        image: Option<String>,
        price: Price,
        description: Option<String>,
        category_id: CategoryId,
        stock_quantity: i64,
        available: bool,
        tags: Vec<String>,
        images: Vec<String>,
    ) -> Result<Self, ProductFieldError> {
        if name.trim().is_empty() {
            return Err(ProductFieldError::EmptyName);
        }
        if stock_quantity < 0 {
            return Err(ProductFieldError::NegativeStock);
        }
        Ok(Self {
            name,
            image,
            price,
            description,
            category_id,
            stock_quantity,
            available,
            tags,
            images,
        })
    }
}

/// Partial update for a product; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub stock_quantity: Option<i64>,
    pub available: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl ProductUpdate {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns an error if a present name is empty or a present stock
    /// quantity is negative.
    pub fn validate(&self) -> Result<(), ProductFieldError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(ProductFieldError::EmptyName);
        }
        if let Some(stock) = self.stock_quantity
            && stock < 0
        {
            return Err(ProductFieldError::NegativeStock);
        }
        Ok(())
    }

    /// Apply this update to an existing product in place.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(image) = &self.image {
            product.image = Some(image.clone());
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(stock) = self.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(available) = self.available {
            product.available = available;
        }
        if let Some(tags) = &self.tags {
            product.tags.clone_from(tags);
        }
        if let Some(images) = &self.images {
            product.images.clone_from(images);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn price(amount: rust_decimal::Decimal) -> Price {
        Price::new(amount).unwrap()
    }

    #[test]
    fn test_new_product_rejects_empty_name() {
        let result = NewProduct::new(
            "  ".to_owned(),
            None,
            price(dec!(10)),
            None,
            CategoryId::new(1),
            5,
            true,
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(ProductFieldError::EmptyName)));
    }

    #[test]
    fn test_new_product_rejects_negative_stock() {
        let result = NewProduct::new(
            "Ring".to_owned(),
            None,
            price(dec!(50)),
            None,
            CategoryId::new(1),
            -1,
            true,
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(ProductFieldError::NegativeStock)));
    }

    #[test]
    fn test_update_validate() {
        let update = ProductUpdate {
            stock_quantity: Some(-2),
            ..ProductUpdate::default()
        };
        assert!(update.validate().is_err());

        let update = ProductUpdate {
            stock_quantity: Some(0),
            name: Some("Bracelet".to_owned()),
            ..ProductUpdate::default()
        };
        assert!(update.validate().is_ok());
    }
}
