//! services/api/src/web/mod.rs
//!
//! Route table and OpenAPI definition for the REST surface.

pub mod ai;
pub mod products;
pub mod profiles;
pub mod requests;
pub mod state;
pub mod users;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(ai::chat),
    components(schemas(ai::AiRequest, ai::AiResponse, ai::TurnPayload)),
    tags(
        (name = "Fixit API", description = "Marketplace backend: catalog, professionals, job requests, and the AI assistant.")
    )
)]
pub struct ApiDoc;

/// Build the full `/api` router over the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    let products = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route("/search", get(products::search_products))
        .route("/top-rated", get(products::top_rated_products))
        .route("/category/{category}", get(products::products_by_category))
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        );

    let profiles = Router::new()
        .route("/", get(profiles::list_profiles).post(profiles::create_profile))
        .route("/available", get(profiles::available_profiles))
        .route("/top-rated", get(profiles::top_rated_profiles))
        .route("/profession/{profession}", get(profiles::profiles_by_profession))
        .route("/{id}/availability", put(profiles::set_availability))
        .route("/{id}/rating", put(profiles::set_rating))
        .route(
            "/{id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        );

    let requests = Router::new()
        .route("/", get(requests::list_requests).post(requests::create_request))
        .route("/open", get(requests::open_requests))
        .route("/recent", get(requests::recent_requests))
        .route("/status/{status}", get(requests::requests_by_status))
        .route("/customer/{customer_id}", get(requests::requests_by_customer))
        .route(
            "/professional/{professional_id}",
            get(requests::requests_by_professional),
        )
        .route("/category/{category}", get(requests::requests_by_category))
        .route("/{id}/accept", post(requests::accept_job))
        .route("/{id}/complete", post(requests::complete_job))
        .route("/{id}", get(requests::get_request));

    let users = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/customer/{customer_id}", get(users::user_by_customer_id))
        .route("/email/{email}", get(users::user_by_email))
        .route("/role/{role}", get(users::users_by_role))
        .route("/{id}", get(users::get_user).put(users::update_user));

    let ai = Router::new()
        .route("/", post(ai::chat))
        .route(
            "/history/{session_id}",
            get(ai::get_history).delete(ai::clear_history),
        );

    Router::new()
        .nest("/api/products", products)
        .nest("/api/service-profiles", profiles)
        .nest("/api/service-requests", requests)
        .nest("/api/users", users)
        .nest("/api/ai", ai)
        .with_state(app_state)
}
