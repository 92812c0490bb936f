//! services/api/src/web/requests.rs
//!
//! Axum handlers for the job-request board and its status lifecycle.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::web::products::LimitParams;
use crate::web::state::AppState;
use fixit_core::domain::{NewServiceRequest, RequestStatus, ServiceRequest};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptJobPayload {
    pub professional_id: String,
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.get_all().await?))
}

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewServiceRequest>,
) -> Result<(StatusCode, Json<ServiceRequest>), ApiError> {
    let request = state.requests.create(input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRequest>, ApiError> {
    Ok(Json(state.requests.get_by_id(&id).await?))
}

pub async fn accept_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AcceptJobPayload>,
) -> Result<Json<ServiceRequest>, ApiError> {
    Ok(Json(
        state
            .requests
            .accept_job(&id, &payload.professional_id)
            .await?,
    ))
}

pub async fn complete_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRequest>, ApiError> {
    Ok(Json(state.requests.complete_job(&id).await?))
}

pub async fn open_requests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.get_open().await?))
}

pub async fn recent_requests(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.recent(params.limit.unwrap_or(20)).await?))
}

pub async fn requests_by_status(
    State(state): State<Arc<AppState>>,
    Path(status): Path<RequestStatus>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.get_by_status(status).await?))
}

pub async fn requests_by_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.get_by_customer(&customer_id).await?))
}

pub async fn requests_by_professional(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(
        state.requests.get_by_professional(&professional_id).await?,
    ))
}

pub async fn requests_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    Ok(Json(state.requests.get_by_category(&category).await?))
}
