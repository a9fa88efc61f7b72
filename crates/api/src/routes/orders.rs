//! Order handlers: checkout, listing, and status lifecycle.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use plaza_core::{OrderId, OrderStatus, PaymentStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    status: String,
}

/// `POST /orders/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<CheckoutRequest>>,
) -> Result<(StatusCode, Json<Order>)> {
    let address = body.and_then(|Json(b)| b.address);

    let order = state.stores().orders.checkout(user.id, address).await?;

    if let Some(activity) = state.stores().activity.as_ref() {
        activity
            .notify(
                user.id,
                &format!("Order #{} placed, total {}.", order.id, order.total_price),
            )
            .await?;
    }

    tracing::info!(order_id = %order.id, user_id = %user.id, total = %order.total_price, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.stores().orders.orders_for_user(user.id).await?))
}

/// `GET /orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = state
        .stores()
        .orders
        .get_order(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_owned()))?;

    // Owners see their own orders; admins see all of them.
    if order.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::NotFound("Order not found.".to_owned()));
    }

    Ok(Json(order))
}

/// `POST /orders/{id}/status` (admin)
pub async fn set_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Order>> {
    user.require_admin()?;

    let next: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid status '{}'.", body.status)))?;

    let order = state
        .stores()
        .orders
        .set_status(OrderId::new(id), next)
        .await?;

    if let Some(activity) = state.stores().activity.as_ref() {
        activity
            .notify(
                order.user_id,
                &format!("Order #{} is now {}.", order.id, order.status),
            )
            .await?;
    }

    Ok(Json(order))
}

/// `POST /orders/{id}/payment_status` (admin)
pub async fn set_payment_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Order>> {
    user.require_admin()?;

    let next: PaymentStatus = body
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid payment status '{}'.", body.status)))?;

    let order = state
        .stores()
        .orders
        .set_payment_status(OrderId::new(id), next)
        .await?;

    Ok(Json(order))
}

/// `POST /orders/{id}/cancel`
///
/// Owners may cancel their own order while it is still pending or
/// paid; the transition whitelist rejects anything later.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let id = OrderId::new(id);

    let order = state
        .stores()
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_owned()))?;

    if order.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::NotFound("Order not found.".to_owned()));
    }

    let order = state
        .stores()
        .orders
        .set_status(id, OrderStatus::Cancelled)
        .await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, "order cancelled");

    Ok(Json(order))
}
