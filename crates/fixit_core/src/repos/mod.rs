//! crates/fixit_core/src/repos/mod.rs
//!
//! The repositories: typed entity access built on the entity store port.
//! Each repository owns one table, translates between domain structs and
//! stored JSON documents, and maps storage faults into the core taxonomy.

pub mod chat;
pub mod product;
pub mod profile;
pub mod request;
pub mod user;

pub use chat::ChatRepository;
pub use product::ProductRepository;
pub use profile::ServiceProfileRepository;
pub use request::ServiceRequestRepository;
pub use user::UserRepository;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::store::{Item, StoreError};

/// Serialize a domain struct into a stored document.
pub(crate) fn to_item<T: Serialize>(
    entity: &'static str,
    operation: &'static str,
    value: &T,
) -> CoreResult<Item> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CoreError::database(
            entity,
            operation,
            "entity did not serialize to a document",
        )),
        Err(err) => Err(CoreError::database(entity, operation, err)),
    }
}

/// Deserialize a stored document back into a domain struct.
pub(crate) fn from_item<T: DeserializeOwned>(
    entity: &'static str,
    operation: &'static str,
    item: Item,
) -> CoreResult<T> {
    serde_json::from_value(Value::Object(item))
        .map_err(|err| CoreError::database(entity, operation, format!("corrupt document: {err}")))
}

/// Wrap an unhandled storage fault with entity/operation context.
pub(crate) fn storage(entity: &'static str, operation: &'static str, err: StoreError) -> CoreError {
    tracing::error!(entity, operation, error = %err, "storage operation failed");
    CoreError::database(entity, operation, err)
}

/// JSON value of any serializable field. Serialization of the plain enums
/// and timestamps used here cannot fail; a `Null` stands in if it ever did.
pub(crate) fn json_of<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Placeholder image URI used when a caller supplies none.
pub(crate) fn placeholder_image(size: u32) -> String {
    format!(
        "https://picsum.photos/{size}/{size}?random={}",
        Utc::now().timestamp_millis()
    )
}

/// Shared rating bounds check, applied before any storage call.
pub(crate) fn validate_rating(rating: f64) -> CoreResult<()> {
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "rating must be between 0 and 5, got {rating}"
        )))
    }
}
