//! JWT issuing and verification.
//!
//! Access tokens authenticate API requests; refresh tokens can only be
//! exchanged for a new access token. The `kind` claim keeps the two
//! from being used interchangeably.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use plaza_core::UserRole;

use crate::models::User;

use super::error::AuthError;

/// Which lifecycle a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by every token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i64,
    pub username: String,
    pub role: UserRole,
    pub kind: TokenKind,
    /// Unique token ID.
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// An access/refresh token pair, as returned by the token endpoint.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies tokens with a shared HMAC secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &SecretString, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(user, TokenKind::Access)?,
            refresh: self.issue(user, TokenKind::Refresh)?,
        })
    }

    /// Issue a single access token (used by the refresh flow).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_access(&self, user: &User) -> Result<String, AuthError> {
        self.issue(user, TokenKind::Access)
    }

    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.as_i64(),
            username: user.username.to_string(),
            role: user.role,
            kind,
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::Token)
    }

    /// Verify a token's signature, expiry and kind.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token is invalid, expired, or
    /// not of `expected` kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::Token)?;

        if data.claims.kind != expected {
            return Err(AuthError::Token);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plaza_core::{Email, UserId, Username};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &SecretString::from("a-test-signing-secret-of-decent-length"),
            Duration::from_secs(900),
            Duration::from_secs(86_400),
        )
    }

    fn user() -> User {
        User {
            id: UserId::new(7),
            username: Username::parse("alice").unwrap(),
            email: Email::parse("alice@example.com").unwrap(),
            role: UserRole::Consumer,
            verified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip_access_token() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&user()).unwrap();

        let claims = issuer.verify(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, UserRole::Consumer);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&user()).unwrap();

        assert!(issuer.verify(&pair.refresh, TokenKind::Access).is_err());
        assert!(issuer.verify(&pair.refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = issuer().issue_pair(&user()).unwrap();

        let other = TokenIssuer::new(
            &SecretString::from("a-different-signing-secret-entirely!!"),
            Duration::from_secs(900),
            Duration::from_secs(86_400),
        );
        assert!(other.verify(&pair.access, TokenKind::Access).is_err());
    }
}
