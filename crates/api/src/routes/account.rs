//! Account activity handlers (document backend only).
//!
//! Browsing history, wishlists, notifications and the admin audit log
//! exist only where the backend carries activity collections. On a
//! relational deployment these routes answer 404.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use plaza_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{AdminLogEntry, BrowsingEvent, ErrorLogEntry, Notification, WishlistEntry};
use crate::state::AppState;
use crate::store::ActivityStore;

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    product_id: i64,
}

fn activity(state: &AppState) -> Result<&Arc<dyn ActivityStore>> {
    state
        .stores()
        .activity
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not found.".to_owned()))
}

/// `GET /account/history`
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<BrowsingEvent>>> {
    Ok(Json(activity(&state)?.history(user.id).await?))
}

/// `GET /account/wishlist`
pub async fn wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<WishlistEntry>>> {
    Ok(Json(activity(&state)?.wishlist(user.id).await?))
}

/// `POST /account/wishlist`
pub async fn add_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<WishlistRequest>,
) -> Result<(StatusCode, Json<WishlistEntry>)> {
    let store = activity(&state)?;

    // The product must exist; wishlists do not hold dangling references.
    let product = ProductId::new(body.product_id);
    state
        .stores()
        .catalog
        .get_product(product)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_owned()))?;

    let entry = store.add_wishlist(user.id, product).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// `DELETE /account/wishlist/{product_id}`
pub async fn remove_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<i64>,
) -> Result<StatusCode> {
    activity(&state)?
        .remove_wishlist(user.id, ProductId::new(product_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /account/notifications`
pub async fn notifications(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(activity(&state)?.notifications(user.id).await?))
}

/// `GET /admin/logs` (admin)
pub async fn admin_logs(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<AdminLogEntry>>> {
    user.require_admin()?;

    Ok(Json(activity(&state)?.admin_log().await?))
}

/// `GET /admin/errors` (admin)
pub async fn error_logs(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ErrorLogEntry>>> {
    user.require_admin()?;

    Ok(Json(activity(&state)?.error_log().await?))
}
