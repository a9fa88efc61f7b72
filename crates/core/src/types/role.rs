//! User roles.

use serde::{Deserialize, Serialize};

/// Marketplace role with different permission levels.
///
/// Signup always creates a `Consumer`; role changes are an admin
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including category and user management.
    Admin,
    /// May create and manage their own products.
    Producer,
    /// Default role: may browse, cart, and order.
    #[default]
    Consumer,
}

impl UserRole {
    /// Whether this role may manage the product catalog at all.
    #[must_use]
    pub const fn can_manage_products(self) -> bool {
        matches!(self, Self::Admin | Self::Producer)
    }

    /// Whether this role has administrative access.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Producer => write!(f, "producer"),
            Self::Consumer => write!(f, "consumer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "producer" => Ok(Self::Producer),
            "consumer" => Ok(Self::Consumer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_is_consumer() {
        assert_eq!(UserRole::default(), UserRole::Consumer);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for role in [UserRole::Admin, UserRole::Producer, UserRole::Consumer] {
            assert_eq!(UserRole::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[test]
    fn test_permissions() {
        assert!(UserRole::Admin.can_manage_products());
        assert!(UserRole::Producer.can_manage_products());
        assert!(!UserRole::Consumer.can_manage_products());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Producer.is_admin());
    }
}
