//! Authentication extractors.
//!
//! Handlers take [`RequireAuth`] to demand a valid bearer token, or
//! [`OptionalAuth`] where anonymous access is allowed but an
//! authenticated user gets extra behavior (e.g. browsing history).

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use plaza_core::{UserId, UserRole};

use crate::error::AppError;
use crate::services::auth::TokenKind;
use crate::state::AppState;

/// The authenticated caller, decoded from the access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required.".to_owned()))
        }
    }

    /// # Errors
    ///
    /// Returns `AppError::Forbidden` unless the caller can manage
    /// products (producer or admin).
    pub fn require_producer(&self) -> Result<(), AppError> {
        if self.role.can_manage_products() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Producer or admin access required.".to_owned(),
            ))
        }
    }
}

/// Extractor that requires a valid `Bearer` access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that decodes a bearer token if one is present.
///
/// An invalid token is treated the same as no token; routes using this
/// extractor never fail on auth.
pub struct OptionalAuth(pub Option<CurrentUser>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn decode_user(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.tokens().verify(token, TokenKind::Access)?;
    Ok(CurrentUser {
        id: UserId::new(claims.sub),
        username: claims.username,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided.".to_owned())
        })?;

        decode_user(state, token).map(Self)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts).and_then(|token| decode_user(state, token).ok());
        Ok(Self(user))
    }
}
