//! services/api/src/bin/api.rs

use std::sync::Arc;

use api_lib::{
    adapters::{
        assistant::GeminiAssistant,
        store::{MemoryStore, TimeoutStore},
    },
    config::Config,
    error::ApiError,
    web::{self, state::AppState, ApiDoc},
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fixit_core::ports::AssistantService;
use fixit_core::store::EntityStore;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Set Up the Entity Store ---
    // In-process document store with the configured tables provisioned up
    // front, wrapped so every round-trip carries the configured timeout.
    let store: Arc<dyn EntityStore> = Arc::new(TimeoutStore::new(
        MemoryStore::new(config.tables.all()),
        config.store_timeout,
    ));

    // --- 3. Initialize the Assistant Adapter ---
    let assistant: Option<Arc<dyn AssistantService>> = match &config.gemini_api_key {
        Some(key) => Some(Arc::new(GeminiAssistant::new(
            key.clone(),
            config.gemini_model.clone(),
        ))),
        None => {
            warn!("GEMINI_API_KEY is unset; the AI assistant will serve offline replies");
            None
        }
    };

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(config.clone(), store, assistant));

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("invalid CORS_ORIGIN: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let app = web::router(app_state)
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
