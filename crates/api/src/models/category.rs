//! Category domain types.

use serde::Serialize;

use plaza_core::CategoryId;

/// A product category.
///
/// Categories are shared: many products reference one category, and
/// deleting a category cascades to its products.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Errors from validating category input.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CategoryFieldError {
    #[error("category name cannot be empty")]
    EmptyName,
}

/// Validated input form for creating or replacing a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    /// Validate and construct a `NewCategory`.
    ///
    /// # Errors
    ///
    /// Returns `CategoryFieldError::EmptyName` if the name is empty or
    /// all whitespace.
    pub fn new(name: String, description: Option<String>) -> Result<Self, CategoryFieldError> {
        if name.trim().is_empty() {
            return Err(CategoryFieldError::EmptyName);
        }
        Ok(Self { name, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_name() {
        assert!(NewCategory::new(String::new(), None).is_err());
        assert!(NewCategory::new("   ".to_owned(), None).is_err());
    }

    #[test]
    fn test_accepts_name() {
        assert!(NewCategory::new("Jewelry".to_owned(), Some("Shiny".to_owned())).is_ok());
    }
}
