//! services/api/src/web/products.rs
//!
//! Axum handlers for the product catalog endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::web::state::AppState;
use fixit_core::domain::{NewProduct, Product, ProductCategory, ProductPatch};
use fixit_core::CoreError;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.get_all().await?))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get_by_id(&id).await?))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update(&id, patch).await?))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.products.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn products_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<ProductCategory>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.get_by_category(category).await?))
}

pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    if params.q.trim().len() < 2 {
        return Err(CoreError::Validation(
            "search query must be at least 2 characters".to_string(),
        )
        .into());
    }
    Ok(Json(state.products.search(&params.q).await?))
}

pub async fn top_rated_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.top_rated(params.limit.unwrap_or(10)).await?))
}
