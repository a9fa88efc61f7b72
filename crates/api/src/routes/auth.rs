//! Auth handlers: signup, token issuance, refresh, current user.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use plaza_core::UserRole;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::AuthError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    refresh: Option<String>,
}

/// Pull a required, non-empty field out of an `Option<String>`.
fn required(field: Option<&String>) -> std::result::Result<&str, AuthError> {
    match field.map(String::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::MissingField),
    }
}

/// `POST /signup`
///
/// Accounts self-register as `consumer` or `producer`; admin accounts
/// are created out of band (seed or role change by an existing admin).
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let username = required(body.username.as_ref())?;
    let email = required(body.email.as_ref())?;
    let password = required(body.password.as_ref())?;

    let role = match body.role.as_deref() {
        None => UserRole::Consumer,
        Some("consumer") => UserRole::Consumer,
        Some("producer") => UserRole::Producer,
        Some(other) => {
            return Err(AppError::Validation(format!("Invalid role '{other}'.")));
        }
    };

    let user = state.auth().signup(username, email, password, role).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user signed up");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /token`
pub async fn token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<Value>> {
    let username = required(body.username.as_ref())?;
    let password = required(body.password.as_ref())?;

    let (user, pair) = state.auth().login(username, password).await?;

    tracing::debug!(user_id = %user.id, "issued token pair");

    Ok(Json(json!({
        "access": pair.access,
        "refresh": pair.refresh,
    })))
}

/// `POST /token/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<Value>> {
    let refresh_token = body.refresh.as_deref().ok_or(AuthError::Token)?;

    let access = state.auth().refresh(refresh_token).await?;

    Ok(Json(json!({ "access": access })))
}

/// `GET /me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = state
        .stores()
        .identity
        .get_user(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_owned()))?;

    Ok(Json(user))
}
