//! Authentication service: signup, login, token refresh.

mod error;
mod tokens;

pub use error::AuthError;
pub use tokens::{Claims, TokenIssuer, TokenKind, TokenPair};

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use plaza_core::{Email, UserId, UserRole, Username};

use crate::models::{NewUser, User};
use crate::store::{IdentityStore, StoreError};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Signup, login and refresh flows over an identity store.
pub struct AuthService {
    identity: Arc<dyn IdentityStore>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { identity, tokens }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Fails on invalid username/email, a password shorter than
    /// [`MIN_PASSWORD_LENGTH`], or a duplicate username/email.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let password_hash = hash_password(password)?;

        let user = self
            .identity
            .create_user(NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(msg) => AuthError::Duplicate(msg),
                other => AuthError::Store(other),
            })?;

        Ok(user)
    }

    /// Exchange credentials for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Fails with `AuthError::InvalidCredentials` for an unknown user or
    /// a wrong password; the two cases are indistinguishable from the
    /// outside.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, hash)) = self.identity.password_hash_for(&username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The user record is re-read so role changes since issuance take
    /// effect in the new token.
    ///
    /// # Errors
    ///
    /// Fails with `AuthError::Token` on an invalid or non-refresh token,
    /// or if the user no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .identity
            .get_user(UserId::new(claims.sub))
            .await?
            .ok_or(AuthError::Token)?;

        self.tokens.issue_access(&user)
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC-format hash.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller cannot do anything more useful with that distinction.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-hash"));
    }
}
