//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Names of the document-store tables, overridable per environment.
#[derive(Clone, Debug)]
pub struct TableNames {
    pub products: String,
    pub profiles: String,
    pub requests: String,
    pub chat: String,
    pub users: String,
    pub counters: String,
}

impl TableNames {
    fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };
        Self {
            products: var("FIXIT_PRODUCTS_TABLE", "fixit-products"),
            profiles: var("FIXIT_PROFILES_TABLE", "fixit-service-profiles"),
            requests: var("FIXIT_REQUESTS_TABLE", "fixit-service-requests"),
            chat: var("FIXIT_CHAT_TABLE", "fixit-chat"),
            users: var("FIXIT_USERS_TABLE", "fixit-users"),
            counters: var("FIXIT_COUNTERS_TABLE", "fixit-counters"),
        }
    }

    /// All table names, for store adapters that provision tables up front.
    pub fn all(&self) -> Vec<String> {
        vec![
            self.products.clone(),
            self.profiles.clone(),
            self.requests.clone(),
            self.chat.clone(),
            self.users.clone(),
            self.counters.clone(),
        ]
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Ceiling on any single storage round-trip.
    pub store_timeout: Duration,
    pub tables: TableNames,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure
    /// tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // The AI key is optional; the assistant degrades to an offline
        // message without it.
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let timeout_ms_str =
            std::env::var("STORE_TIMEOUT_MS").unwrap_or_else(|_| "5000".to_string());
        let timeout_ms = timeout_ms_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("STORE_TIMEOUT_MS".to_string(), e.to_string())
        })?;

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            gemini_api_key,
            gemini_model,
            store_timeout: Duration::from_millis(timeout_ms),
            tables: TableNames::from_env(),
        })
    }
}
