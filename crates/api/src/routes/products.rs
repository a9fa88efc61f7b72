//! Product handlers: CRUD plus the catalog filter endpoints.
//!
//! Reads are public; writes require a producer or admin, and only the
//! owning producer (or an admin) may modify an existing product.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use plaza_core::{CategoryId, Price, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, OptionalAuth, RequireAuth};
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    name: String,
    image: Option<String>,
    price: Decimal,
    description: Option<String>,
    category_id: i64,
    #[serde(default)]
    stock_quantity: i64,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    images: Vec<String>,
}

const fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    name: Option<String>,
    image: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    category_id: Option<i64>,
    stock_quantity: Option<i64>,
    available: Option<bool>,
    tags: Option<Vec<String>>,
    images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    min_price: Option<String>,
    max_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    available: Option<String>,
}

/// `GET /products`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.stores().catalog.list_products().await?))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    user.require_producer()?;

    let price = Price::new(body.price).map_err(|e| AppError::Validation(e.to_string()))?;
    let new = NewProduct::new(
        body.name,
        body.image,
        price,
        body.description,
        CategoryId::new(body.category_id),
        body.stock_quantity,
        body.available,
        body.tags,
        body.images,
    )
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = state
        .stores()
        .catalog
        .create_product(user.id, new)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Category not found.".to_owned()),
            other => AppError::Store(other),
        })?;

    tracing::info!(product_id = %product.id, producer_id = %user.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products/{id}`
///
/// An authenticated view is recorded into the caller's browsing
/// history when the backend carries activity collections.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let product = state
        .stores()
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_owned()))?;

    if let (Some(user), Some(activity)) = (user, state.stores().activity.as_ref()) {
        activity.record_view(user.id, id).await?;
    }

    Ok(Json(product))
}

/// Owner producer or admin.
async fn authorize_product_write(
    state: &AppState,
    user: &CurrentUser,
    id: ProductId,
) -> Result<Product> {
    let product = state
        .stores()
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_owned()))?;

    if !user.role.is_admin() && product.producer_id != user.id {
        return Err(AppError::Forbidden(
            "You do not own this product.".to_owned(),
        ));
    }
    Ok(product)
}

/// `PUT /products/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    user.require_producer()?;
    let id = ProductId::new(id);
    authorize_product_write(&state, &user, id).await?;

    let price = body
        .price
        .map(Price::new)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let update = ProductUpdate {
        name: body.name,
        image: body.image,
        price,
        description: body.description,
        category_id: body.category_id.map(CategoryId::new),
        stock_quantity: body.stock_quantity,
        available: body.available,
        tags: body.tags,
        images: body.images,
    };
    update
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = state
        .stores()
        .catalog
        .update_product(id, update)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Category not found.".to_owned()),
            other => AppError::Store(other),
        })?;

    Ok(Json(product))
}

/// `DELETE /products/{id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    user.require_producer()?;
    let id = ProductId::new(id);
    authorize_product_write(&state, &user, id).await?;

    state.stores().catalog.delete_product(id).await?;

    tracing::info!(product_id = %id, user_id = %user.id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /products/search?q=`
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let q = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please provide a search query.".to_owned()))?;

    Ok(Json(state.stores().catalog.search_products(q).await?))
}

/// `GET /products/filter_by_category?category=`
pub async fn filter_by_category(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Product>>> {
    let name = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please provide a category name.".to_owned()))?;

    let products = state
        .stores()
        .catalog
        .filter_by_category(name)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("Category not found.".to_owned()),
            other => AppError::Store(other),
        })?;

    Ok(Json(products))
}

/// `GET /products/filter_by_price?min_price=&max_price=`
///
/// Both bounds are optional and inclusive; a missing minimum means 0
/// and a missing maximum means unbounded. An inverted range is not an
/// error, it just matches nothing.
pub async fn filter_by_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Vec<Product>>> {
    let invalid = || AppError::BadRequest("Invalid price range.".to_owned());

    let min = match query.min_price.as_deref().filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse::<Decimal>().map_err(|_| invalid())?,
        None => Decimal::ZERO,
    };
    let max = query
        .max_price
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::parse::<Decimal>)
        .transpose()
        .map_err(|_| invalid())?;

    if let Some(max) = max
        && max < min
    {
        return Ok(Json(Vec::new()));
    }

    Ok(Json(
        state
            .stores()
            .catalog
            .filter_by_price_range(min, max)
            .await?,
    ))
}

/// `GET /products/filter_by_availability?available=`
pub async fn filter_by_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Product>>> {
    let available = match query.available.as_deref().map(str::to_lowercase).as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => {
            return Err(AppError::BadRequest(
                "Provide 'available' as true or false.".to_owned(),
            ));
        }
    };

    Ok(Json(
        state
            .stores()
            .catalog
            .filter_by_availability(available)
            .await?,
    ))
}
