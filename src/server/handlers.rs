//! HTTP handlers for product operations
//!
//! Handlers are thin: extract, call [`ProductService`](crate::core::ProductService),
//! wrap the result in the `{ "success": true, ... }` envelope.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::state::AppState;
use crate::core::error::{CatalogError, CatalogResult, RequestError};
use crate::core::product::{NewProduct, Product, ProductPatch};
use crate::core::query::{ListParams, PaginatedResponse};
use crate::core::validation::Validated;

/// Envelope for single-product responses
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Reference to a deleted product
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedProduct {
    pub id: Uuid,
}

/// Response of `DELETE /api/products/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub data: DeletedProduct,
}

/// Convert a validated payload into its typed form
fn decode<T: DeserializeOwned>(payload: Value) -> CatalogResult<T> {
    serde_json::from_value(payload).map_err(|e| {
        RequestError::InvalidBody {
            message: e.to_string(),
        }
        .into()
    })
}

/// List products
///
/// GET /api/products?search=&name=&creator=&minPrice=&maxPrice=&sortBy=&sortOrder=&page=&limit=
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> CatalogResult<Json<PaginatedResponse<Product>>> {
    let Query(params) = params.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;

    Ok(Json(state.products.list(&params).await?))
}

/// Get a product by id
///
/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<Json<DataResponse<Product>>> {
    let product = state.products.get(&id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// Create a product
///
/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    payload: Validated<Product>,
) -> CatalogResult<impl IntoResponse> {
    let draft: NewProduct = decode(payload.into_inner())?;
    let product = state.products.create(draft).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

/// Partially update a product
///
/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Validated<Product>,
) -> CatalogResult<Json<DataResponse<Product>>> {
    let patch: ProductPatch = decode(payload.into_inner())?;
    let product = state.products.update(&id, patch).await?;

    Ok(Json(DataResponse::new(product)))
}

/// Delete a product
///
/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<Json<DeleteResponse>> {
    let id = state.products.delete(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Product deleted".to_string(),
        data: DeletedProduct { id },
    }))
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API running..." }))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unmatched routes
pub async fn route_not_found() -> CatalogError {
    CatalogError::RouteNotFound
}
