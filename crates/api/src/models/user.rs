//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{Email, UserId, UserRole, Username};

/// A marketplace user (domain type).
///
/// The password hash is deliberately absent: it never leaves the
/// identity store except through `password_hash_for`, so a `User`
/// value is always safe to serialize into a response.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login handle, unique across all users.
    pub username: Username,
    /// Email address, unique across all users.
    pub email: Email,
    /// Marketplace role.
    pub role: UserRole,
    /// Whether the account has been verified.
    pub verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Input form for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    /// Argon2 PHC-format hash, already computed by the auth service.
    pub password_hash: String,
    pub role: UserRole,
}
