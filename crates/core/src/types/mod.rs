//! Core types for Plaza.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::UserRole;
pub use status::{OrderStatus, PaymentStatus};
pub use username::{Username, UsernameError};
