//! Request middleware and extractors.

pub mod auth;
pub mod error_log;

pub use auth::{CurrentUser, OptionalAuth, RequireAuth};
