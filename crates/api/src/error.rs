//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always
//! `{"detail": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Store(StoreError::Database(_) | StoreError::DataCorruption(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(err) => match err {
                StoreError::Database(_) | StoreError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) | StoreError::EmptyCart => StatusCode::BAD_REQUEST,
                StoreError::InsufficientStock { .. } | StoreError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Token => StatusCode::UNAUTHORIZED,
                AuthError::Store(StoreError::Database(_) | StoreError::DataCorruption(_))
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Internal(_) => "Internal server error.".to_owned(),
            Self::Store(err) => match err {
                StoreError::Database(_) | StoreError::DataCorruption(_) => {
                    "Internal server error.".to_owned()
                }
                StoreError::NotFound => "Not found.".to_owned(),
                other => other.to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::Store(StoreError::Database(_) | StoreError::DataCorruption(_))
                | AuthError::PasswordHash => "Internal server error.".to_owned(),
                other => other.to_string(),
            },
            Self::Validation(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use plaza_core::ProductId;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("no such product".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("token required".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("admins only".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::InsufficientStock {
                product: ProductId::new(1)
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::InvalidTransition {
                from: "delivered".to_owned(),
                to: "pending".to_owned(),
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::Duplicate(
                "username already taken".to_owned()
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response =
            AppError::Store(StoreError::DataCorruption("raw detail".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
