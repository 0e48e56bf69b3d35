//! Product catalogue handlers. Every route sits behind the session gate.

use crate::{
    api::extract::{parse_id, ApiJson},
    db::Product,
    types::{
        AppError, DeleteResponse, ProductListResponse, ProductRequest, ProductResponse, Result,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListProductsQuery {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

fn validate(payload: &ProductRequest) -> Result<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Product name is required".to_string()));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::InvalidInput(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// List products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products", body = ProductListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductListResponse>> {
    let search = query.search.as_deref().filter(|s| !s.is_empty());
    let items: Vec<ProductResponse> = state
        .db
        .list_products(search)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(Json(ProductListResponse {
        total: items.len(),
        items,
    }))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    validate(&payload)?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        category: payload.category,
        image: payload.image,
        description: payload.description,
        price: payload.price,
        created_at: Utc::now().timestamp(),
    };
    state.db.create_product(&product).await?;

    info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;

    let product = state
        .db
        .get_product_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Invalid ID or input"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn replace_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;
    validate(&payload)?;

    let product = Product {
        id,
        name: payload.name,
        category: payload.category,
        image: payload.image,
        description: payload.description,
        price: payload.price,
        created_at: 0,
    };

    if !state.db.replace_product(&product).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    info!(product_id = %product.id, "product replaced");

    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;

    if !state.db.delete_product(&id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    info!(product_id = %id, "product deleted");

    Ok(Json(DeleteResponse {
        message: "Product deleted successfully".to_string(),
        id,
    }))
}
