//! Cart handlers. Every route requires auth and touches only the
//! caller's own cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use plaza_core::{CartItemId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartItem;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    product_id: i64,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// `GET /cart`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<CartItem>>> {
    Ok(Json(state.stores().carts.items_for_user(user.id).await?))
}

/// `POST /cart/items`
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItem>)> {
    if body.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1.".to_owned(),
        ));
    }

    let item = state
        .stores()
        .carts
        .add_item(user.id, ProductId::new(body.product_id), body.quantity)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Product not found.".to_owned()),
            other => AppError::Store(other),
        })?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /cart/items/{id}`
///
/// Setting the quantity to zero removes the line.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<StatusCode> {
    let item = CartItemId::new(id);

    if body.quantity < 0 {
        return Err(AppError::Validation(
            "Quantity cannot be negative.".to_owned(),
        ));
    }

    if body.quantity == 0 {
        state.stores().carts.remove_item(user.id, item).await?;
        return Ok(StatusCode::NO_CONTENT);
    }

    state
        .stores()
        .carts
        .update_quantity(user.id, item, body.quantity)
        .await?;

    Ok(StatusCode::OK)
}

/// `DELETE /cart`
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    state.stores().carts.clear(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /cart/items/{id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state
        .stores()
        .carts
        .remove_item(user.id, CartItemId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
