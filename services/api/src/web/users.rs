//! services/api/src/web/users.rs
//!
//! Axum handlers for user profiles. The identity provider is a black box:
//! callers arrive with a stable id + email already verified upstream.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::web::state::AppState;
use fixit_core::domain::{NewUser, User, UserPatch, UserRole};
use fixit_core::CoreError;

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.get_all(params.limit.unwrap_or(50)).await?))
}

/// Idempotent: posting the same identity token twice returns the existing
/// profile rather than erroring or allocating a second customer number.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_by_id(&id).await?))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update(&id, patch).await?))
}

pub async fn user_by_customer_id(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    match state.users.find_by_customer_id(&customer_id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(CoreError::not_found("User", customer_id).into()),
    }
}

pub async fn user_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    match state.users.find_by_email(&email).await? {
        Some(user) => Ok(Json(user)),
        None => Err(CoreError::not_found("User", email).into()),
    }
}

pub async fn users_by_role(
    State(state): State<Arc<AppState>>,
    Path(role): Path<UserRole>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.get_by_role(role).await?))
}
