//! crates/fixit_core/src/error.rs
//!
//! The error taxonomy shared by every repository. Repositories translate
//! storage-layer faults into `Database` with entity/operation context and
//! raise `NotFound`/`Conflict`/`Validation` themselves; nothing below this
//! layer leaks storage-engine-specific errors upward.

/// The failure taxonomy for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or out-of-range input. The caller must fix the request;
    /// never retried automatically.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A state-machine transition was rejected, or a conditional write lost
    /// a race it could not resolve by re-reading.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A storage (or other infrastructure) operation failed; safe to retry
    /// with backoff.
    #[error("{entity}.{operation} failed: {message}")]
    Database {
        entity: &'static str,
        operation: &'static str,
        message: String,
    },

    /// A dependent external service is not configured (e.g. missing API key).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn database(
        entity: &'static str,
        operation: &'static str,
        message: impl ToString,
    ) -> Self {
        Self::Database {
            entity,
            operation,
            message: message.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
