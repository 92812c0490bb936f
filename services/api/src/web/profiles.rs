//! services/api/src/web/profiles.rs
//!
//! Axum handlers for service-professional listings.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::web::products::LimitParams;
use crate::web::state::AppState;
use fixit_core::domain::{NewServiceProfile, Profession, ServiceProfile, ServiceProfilePatch};

#[derive(Deserialize)]
pub struct ProfessionFilter {
    /// When set, restrict the profession listing to available pros.
    pub available: Option<bool>,
}

#[derive(Deserialize)]
pub struct AvailabilityPayload {
    pub available: bool,
}

#[derive(Deserialize)]
pub struct RatingPayload {
    pub rating: f64,
}

pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceProfile>>, ApiError> {
    Ok(Json(state.profiles.get_all().await?))
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewServiceProfile>,
) -> Result<(StatusCode, Json<ServiceProfile>), ApiError> {
    let profile = state.profiles.create(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceProfile>, ApiError> {
    Ok(Json(state.profiles.get_by_id(&id).await?))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ServiceProfilePatch>,
) -> Result<Json<ServiceProfile>, ApiError> {
    Ok(Json(state.profiles.update(&id, patch).await?))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.profiles.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn profiles_by_profession(
    State(state): State<Arc<AppState>>,
    Path(profession): Path<Profession>,
    Query(filter): Query<ProfessionFilter>,
) -> Result<Json<Vec<ServiceProfile>>, ApiError> {
    let profiles = if filter.available.unwrap_or(false) {
        state.profiles.get_available_by_profession(profession).await?
    } else {
        state.profiles.get_by_profession(profession).await?
    };
    Ok(Json(profiles))
}

pub async fn available_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceProfile>>, ApiError> {
    Ok(Json(state.profiles.get_available().await?))
}

pub async fn set_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityPayload>,
) -> Result<Json<ServiceProfile>, ApiError> {
    Ok(Json(
        state.profiles.set_availability(&id, payload.available).await?,
    ))
}

pub async fn set_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<RatingPayload>,
) -> Result<Json<ServiceProfile>, ApiError> {
    Ok(Json(state.profiles.set_rating(&id, payload.rating).await?))
}

pub async fn top_rated_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<ServiceProfile>>, ApiError> {
    Ok(Json(state.profiles.top_rated(params.limit.unwrap_or(10)).await?))
}
