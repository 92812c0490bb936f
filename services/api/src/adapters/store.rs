//! services/api/src/adapters/store.rs
//!
//! Concrete implementations of the `EntityStore` port.
//!
//! `MemoryStore` is an in-process document store used for development and
//! tests; a managed-store adapter would implement the same trait. Every
//! operation takes the table map lock once, which makes each single-item
//! write (including conditional increments) atomic.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use fixit_core::store::{Condition, Delta, EntityStore, Item, Key, StoreError, StoreResult};

/// Tables are fixed at construction; an operation against an unknown table
/// fails with `MissingTable`, mirroring a managed store without the table
/// provisioned. Within a table, items sort by (partition, sort-key) so
/// queries over sort-keyed tables come back in ascending order.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<String, Item>>>,
}

impl MemoryStore {
    pub fn new(tables: impl IntoIterator<Item = String>) -> Self {
        let tables = tables
            .into_iter()
            .map(|name| (name, BTreeMap::new()))
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }
}

/// Unit separator keeps (partition, sort) ordering intact under string
/// concatenation.
fn encode(key: &Key) -> String {
    match &key.sort {
        Some(sort) => format!("{}\u{1f}{}", key.partition, sort),
        None => key.partition.clone(),
    }
}

fn condition_holds(condition: &Condition, existing: Option<&Item>) -> bool {
    match condition {
        Condition::KeyAbsent => existing.is_none(),
        Condition::KeyExists => existing.is_some(),
        Condition::AttributeEquals { attribute, value } => {
            existing.is_some_and(|item| item.get(attribute) == Some(value))
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, table: &str, key: &Key) -> StoreResult<Option<Item>> {
        let tables = self.tables.read().await;
        let items = tables
            .get(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        Ok(items.get(&encode(key)).cloned())
    }

    async fn put(
        &self,
        table: &str,
        key: Key,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        let encoded = encode(&key);
        if let Some(condition) = &condition {
            if !condition_holds(condition, items.get(&encoded)) {
                return Err(StoreError::ConditionFailed(key.to_string()));
            }
        }
        items.insert(encoded, item);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: &Key,
        deltas: Vec<Delta>,
        condition: Option<Condition>,
    ) -> StoreResult<Item> {
        let mut tables = self.tables.write().await;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        let encoded = encode(key);
        let existing = items.get(&encoded);
        if let Some(condition) = &condition {
            if !condition_holds(condition, existing) {
                return Err(StoreError::ConditionFailed(key.to_string()));
            }
        }

        // Unconditional update on a missing key creates the item (upsert).
        let mut item = existing.cloned().unwrap_or_default();
        for delta in deltas {
            match delta {
                Delta::Set { attribute, value } => {
                    item.insert(attribute, value);
                }
                Delta::Increment {
                    attribute,
                    start,
                    by,
                } => {
                    let current = item.get(&attribute).and_then(Value::as_i64).unwrap_or(start);
                    item.insert(attribute, Value::from(current + by));
                }
            }
        }
        items.insert(encoded, item.clone());
        Ok(item)
    }

    async fn scan(&self, table: &str) -> StoreResult<Vec<Item>> {
        let tables = self.tables.read().await;
        let items = tables
            .get(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        Ok(items.values().cloned().collect())
    }

    async fn query(&self, table: &str, filters: &[(&str, Value)]) -> StoreResult<Vec<Item>> {
        let tables = self.tables.read().await;
        let items = tables
            .get(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        Ok(items
            .values()
            .filter(|item| {
                filters
                    .iter()
                    .all(|(attribute, value)| item.get(*attribute) == Some(value))
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, table: &str, key: &Key) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_owned()))?;
        items.remove(&encode(key));
        Ok(())
    }
}

/// Decorator that bounds every storage round-trip, surfacing overruns as
/// the retryable `StoreError::Timeout`.
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>> + Send) -> StoreResult<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

#[async_trait]
impl<S: EntityStore> EntityStore for TimeoutStore<S> {
    async fn get(&self, table: &str, key: &Key) -> StoreResult<Option<Item>> {
        self.bounded(self.inner.get(table, key)).await
    }

    async fn put(
        &self,
        table: &str,
        key: Key,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        self.bounded(self.inner.put(table, key, item, condition)).await
    }

    async fn update(
        &self,
        table: &str,
        key: &Key,
        deltas: Vec<Delta>,
        condition: Option<Condition>,
    ) -> StoreResult<Item> {
        self.bounded(self.inner.update(table, key, deltas, condition))
            .await
    }

    async fn scan(&self, table: &str) -> StoreResult<Vec<Item>> {
        self.bounded(self.inner.scan(table)).await
    }

    async fn query(&self, table: &str, filters: &[(&str, Value)]) -> StoreResult<Vec<Item>> {
        self.bounded(self.inner.query(table, filters)).await
    }

    async fn delete(&self, table: &str, key: &Key) -> StoreResult<()> {
        self.bounded(self.inner.delete(table, key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new(["things".to_string()])
    }

    fn item(pairs: &[(&str, Value)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn conditional_insert_rejects_existing_key() {
        let store = store();
        let key = Key::new("a");
        store
            .put("things", key.clone(), item(&[("id", json!("a"))]), None)
            .await
            .unwrap();
        let err = store
            .put(
                "things",
                key,
                item(&[("id", json!("a"))]),
                Some(Condition::KeyAbsent),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed(_)));
    }

    #[tokio::test]
    async fn increment_seeds_then_adds() {
        let store = store();
        let key = Key::new("counter");
        let delta = || {
            vec![Delta::Increment {
                attribute: "value".into(),
                start: 100,
                by: 1,
            }]
        };
        let first = store.update("things", &key, delta(), None).await.unwrap();
        assert_eq!(first.get("value"), Some(&json!(101)));
        let second = store.update("things", &key, delta(), None).await.unwrap();
        assert_eq!(second.get("value"), Some(&json!(102)));
    }

    #[tokio::test]
    async fn attribute_equals_guards_updates() {
        let store = store();
        let key = Key::new("r1");
        store
            .put(
                "things",
                key.clone(),
                item(&[("status", json!("OPEN"))]),
                None,
            )
            .await
            .unwrap();

        let guard = Condition::AttributeEquals {
            attribute: "status".into(),
            value: json!("OPEN"),
        };
        store
            .update(
                "things",
                &key,
                vec![Delta::set("status", json!("IN_PROGRESS"))],
                Some(guard.clone()),
            )
            .await
            .unwrap();

        // Same guard again: the status moved on, so the write must fail.
        let err = store
            .update(
                "things",
                &key,
                vec![Delta::set("status", json!("IN_PROGRESS"))],
                Some(guard),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed(_)));
    }

    #[tokio::test]
    async fn query_on_sort_keyed_table_is_ordered() {
        let store = store();
        for ts in ["2026-01-01T00:00:02Z", "2026-01-01T00:00:01Z"] {
            store
                .put(
                    "things",
                    Key::with_sort("s1", ts),
                    item(&[("sessionId", json!("s1")), ("timestamp", json!(ts))]),
                    None,
                )
                .await
                .unwrap();
        }
        let items = store
            .query("things", &[("sessionId", json!("s1"))])
            .await
            .unwrap();
        let stamps: Vec<_> = items.iter().map(|i| i.get("timestamp").unwrap()).collect();
        assert_eq!(
            stamps,
            vec![&json!("2026-01-01T00:00:01Z"), &json!("2026-01-01T00:00:02Z")]
        );
    }

    #[tokio::test]
    async fn unknown_table_is_reported() {
        let store = store();
        let err = store.get("missing", &Key::new("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingTable(_)));
    }

    #[tokio::test]
    async fn timeout_store_passes_results_through() {
        let store = TimeoutStore::new(store(), Duration::from_secs(1));
        store
            .put("things", Key::new("a"), item(&[("id", json!("a"))]), None)
            .await
            .unwrap();
        let fetched = store.get("things", &Key::new("a")).await.unwrap();
        assert!(fetched.is_some());
    }
}
