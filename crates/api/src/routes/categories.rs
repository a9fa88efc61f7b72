//! Category handlers: public reads, admin-only writes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use plaza_core::CategoryId;

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAuth};
use crate::models::{Category, NewCategory};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    name: Option<String>,
}

impl CategoryRequest {
    fn into_new(self) -> Result<NewCategory> {
        NewCategory::new(self.name, self.description)
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

async fn audit(state: &AppState, admin: &CurrentUser, action: String) -> Result<()> {
    if let Some(activity) = state.stores().activity.as_ref() {
        activity.log_admin_action(admin.id, &action).await?;
    }
    Ok(())
}

/// `GET /categories`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.stores().catalog.list_categories().await?))
}

/// `GET /categories/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>> {
    let category = state
        .stores()
        .catalog
        .get_category(CategoryId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found.".to_owned()))?;

    Ok(Json(category))
}

/// `GET /categories/filter_by_name?name=`
pub async fn filter_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Category>>> {
    let name = query
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Please provide a category name to filter.".to_owned())
        })?;

    Ok(Json(
        state.stores().catalog.filter_categories_by_name(name).await?,
    ))
}

/// `POST /categories`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    user.require_admin()?;

    let category = state
        .stores()
        .catalog
        .create_category(body.into_new()?)
        .await?;

    audit(
        &state,
        &user,
        format!("created category {} ({})", category.id, category.name),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /categories/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    user.require_admin()?;

    let category = state
        .stores()
        .catalog
        .update_category(CategoryId::new(id), body.into_new()?)
        .await?;

    audit(&state, &user, format!("updated category {id}")).await?;

    Ok(Json(category))
}

/// `DELETE /categories/{id}`
///
/// Deletes the category and every product in it; the response reports
/// how many products went with it.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    user.require_admin()?;

    let outcome = state
        .stores()
        .catalog
        .delete_category(CategoryId::new(id))
        .await?;

    audit(
        &state,
        &user,
        format!(
            "deleted category {id} and {} products",
            outcome.products_deleted
        ),
    )
    .await?;

    tracing::info!(
        category_id = id,
        products_deleted = outcome.products_deleted,
        "category deleted"
    );

    Ok(Json(json!({ "products_deleted": outcome.products_deleted })))
}
