//! Auth service errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors from signup, login and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required signup field was missing or empty.
    #[error("Missing required fields.")]
    MissingField,

    /// The username failed validation.
    #[error(transparent)]
    InvalidUsername(#[from] plaza_core::UsernameError),

    /// The email failed validation.
    #[error(transparent)]
    InvalidEmail(#[from] plaza_core::EmailError),

    /// The password does not meet the minimum length.
    #[error("Password must be at least {min} characters.")]
    WeakPassword {
        /// Minimum accepted password length.
        min: usize,
    },

    /// Username or email already registered.
    #[error("{0}")]
    Duplicate(String),

    /// Wrong username or password. Does not say which.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// The token is missing, malformed, expired, or of the wrong kind.
    #[error("Invalid or expired token.")]
    Token,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
