//! crates/fixit_core/src/store.rs
//!
//! The entity store port: a thin uniform interface over a key-addressed
//! document collection. Every repository is built on this trait, keeping the
//! core independent of the concrete storage engine (a managed document
//! store in production, an in-memory adapter in development and tests).

use async_trait::async_trait;
use serde_json::Value;

/// One stored document: a flat map of camelCase attributes to JSON values.
pub type Item = serde_json::Map<String, Value>;

/// Addresses a single item. Only the chat table uses a sort key (the
/// message timestamp); every other table is keyed by partition alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub partition: String,
    pub sort: Option<String>,
}

impl Key {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    pub fn with_sort(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "{}/{}", self.partition, sort),
            None => write!(f, "{}", self.partition),
        }
    }
}

/// A server-checked precondition for `put` and `update`. The store
/// evaluates the condition and applies the write as one atomic step.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The addressed key must not exist yet (conditional insert).
    KeyAbsent,
    /// The addressed key must already exist (guarded update).
    KeyExists,
    /// The addressed item must exist and carry `attribute == value`.
    AttributeEquals { attribute: String, value: Value },
}

/// One attribute change applied by `update`.
#[derive(Debug, Clone)]
pub enum Delta {
    /// Overwrite (or add) a single attribute.
    Set { attribute: String, value: Value },
    /// Seed the attribute to `start` if the attribute (or the whole item)
    /// is absent, then add `by` -- all in one indivisible step. This is the
    /// primitive behind the sequential customer-id counter.
    Increment {
        attribute: String,
        start: i64,
        by: i64,
    },
}

impl Delta {
    pub fn set(attribute: impl Into<String>, value: Value) -> Self {
        Self::Set {
            attribute: attribute.into(),
            value,
        }
    }
}

/// Faults raised by a store adapter. Repositories re-wrap everything they
/// do not handle themselves into `CoreError::Database`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("condition failed for key {0}")]
    ConditionFailed(String),
    #[error("table {0} does not exist")]
    MissingTable(String),
    #[error("storage operation timed out")]
    Timeout,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Uniform contract over a key-addressed document collection.
///
/// Every single-item operation is atomic at the key level. `scan` and
/// `query` are not isolated across items: they reflect a point-in-time
/// snapshot and must tolerate concurrent mutation.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch one item by key.
    async fn get(&self, table: &str, key: &Key) -> StoreResult<Option<Item>>;

    /// Write a full item, optionally guarded by a condition.
    async fn put(
        &self,
        table: &str,
        key: Key,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()>;

    /// Apply attribute deltas to one item and return the updated document.
    /// With no condition the item is created if absent (upsert); with a
    /// condition that does not hold, fails with `ConditionFailed`.
    async fn update(
        &self,
        table: &str,
        key: &Key,
        deltas: Vec<Delta>,
        condition: Option<Condition>,
    ) -> StoreResult<Item>;

    /// Full scan of a table.
    async fn scan(&self, table: &str) -> StoreResult<Vec<Item>>;

    /// Equality query: all items where every `(attribute, value)` filter
    /// matches. Models both secondary-index lookups and filtered scans;
    /// for sort-keyed tables results come back in ascending sort order.
    async fn query(&self, table: &str, filters: &[(&str, Value)]) -> StoreResult<Vec<Item>>;

    /// Delete one item by key. Deleting a missing item is not an error.
    async fn delete(&self, table: &str, key: &Key) -> StoreResult<()>;
}
