//! crates/fixit_core/src/repos/profile.rs
//!
//! Repository for service-professional listings. Availability and rating
//! are mutated independently; like products, writes are last-write-wins.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::{NewServiceProfile, Profession, ServiceProfile, ServiceProfilePatch};
use crate::error::{CoreError, CoreResult};
use crate::repos::{from_item, json_of, placeholder_image, storage, to_item, validate_rating};
use crate::store::{Condition, Delta, EntityStore, Key, StoreError};

const ENTITY: &str = "ServiceProfile";

#[derive(Clone)]
pub struct ServiceProfileRepository {
    store: Arc<dyn EntityStore>,
    table: String,
}

impl ServiceProfileRepository {
    pub fn new(store: Arc<dyn EntityStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub async fn create(&self, input: NewServiceProfile) -> CoreResult<ServiceProfile> {
        if input.rate <= 0.0 {
            return Err(CoreError::Validation(format!(
                "rate must be positive, got {}",
                input.rate
            )));
        }
        if let Some(rating) = input.rating {
            validate_rating(rating)?;
        }

        let now = Utc::now();
        let profile = ServiceProfile {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            profession: input.profession,
            rate: input.rate,
            rating: input.rating.unwrap_or(0.0),
            image: input.image.unwrap_or_else(|| placeholder_image(200)),
            available: input.available.unwrap_or(true),
            created_at: Some(now),
            updated_at: Some(now),
        };

        let item = to_item(ENTITY, "create", &profile)?;
        self.store
            .put(&self.table, Key::new(&profile.id), item, None)
            .await
            .map_err(|err| storage(ENTITY, "create", err))?;
        info!(id = %profile.id, profession = ?profile.profession, "created service profile");
        Ok(profile)
    }

    pub async fn update(&self, id: &str, patch: ServiceProfilePatch) -> CoreResult<ServiceProfile> {
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        if let Some(rate) = patch.rate {
            if rate <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "rate must be positive, got {rate}"
                )));
            }
        }

        let mut deltas = Vec::new();
        if let Some(name) = patch.name {
            deltas.push(Delta::set("name", Value::String(name)));
        }
        if let Some(profession) = patch.profession {
            deltas.push(Delta::set("profession", json_of(&profession)));
        }
        if let Some(rate) = patch.rate {
            deltas.push(Delta::set("rate", Value::from(rate)));
        }
        if let Some(rating) = patch.rating {
            deltas.push(Delta::set("rating", Value::from(rating)));
        }
        if let Some(image) = patch.image {
            deltas.push(Delta::set("image", Value::String(image)));
        }
        if let Some(available) = patch.available {
            deltas.push(Delta::set("available", Value::Bool(available)));
        }
        if deltas.is_empty() {
            return self.get_by_id(id).await;
        }
        deltas.push(Delta::set("updatedAt", json_of(&Utc::now())));

        match self
            .store
            .update(&self.table, &Key::new(id), deltas, Some(Condition::KeyExists))
            .await
        {
            Ok(item) => from_item(ENTITY, "update", item),
            Err(StoreError::ConditionFailed(_)) => Err(CoreError::not_found(ENTITY, id)),
            Err(err) => Err(storage(ENTITY, "update", err)),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> CoreResult<ServiceProfile> {
        let item = self
            .store
            .get(&self.table, &Key::new(id))
            .await
            .map_err(|err| storage(ENTITY, "get", err))?;
        match item {
            Some(item) => from_item(ENTITY, "get", item),
            None => Err(CoreError::not_found(ENTITY, id)),
        }
    }

    pub async fn get_all(&self) -> CoreResult<Vec<ServiceProfile>> {
        let items = self
            .store
            .scan(&self.table)
            .await
            .map_err(|err| storage(ENTITY, "scan", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "scan", item))
            .collect()
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        self.get_by_id(id).await?;
        self.store
            .delete(&self.table, &Key::new(id))
            .await
            .map_err(|err| storage(ENTITY, "delete", err))?;
        info!(id, "deleted service profile");
        Ok(())
    }

    pub async fn get_by_profession(&self, profession: Profession) -> CoreResult<Vec<ServiceProfile>> {
        let items = self
            .store
            .query(&self.table, &[("profession", json_of(&profession))])
            .await
            .map_err(|err| storage(ENTITY, "query", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "query", item))
            .collect()
    }

    pub async fn get_available(&self) -> CoreResult<Vec<ServiceProfile>> {
        let items = self
            .store
            .query(&self.table, &[("available", Value::Bool(true))])
            .await
            .map_err(|err| storage(ENTITY, "query", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "query", item))
            .collect()
    }

    pub async fn get_available_by_profession(
        &self,
        profession: Profession,
    ) -> CoreResult<Vec<ServiceProfile>> {
        let items = self
            .store
            .query(
                &self.table,
                &[
                    ("profession", json_of(&profession)),
                    ("available", Value::Bool(true)),
                ],
            )
            .await
            .map_err(|err| storage(ENTITY, "query", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "query", item))
            .collect()
    }

    pub async fn set_availability(&self, id: &str, available: bool) -> CoreResult<ServiceProfile> {
        self.update(
            id,
            ServiceProfilePatch {
                available: Some(available),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_rating(&self, id: &str, rating: f64) -> CoreResult<ServiceProfile> {
        self.update(
            id,
            ServiceProfilePatch {
                rating: Some(rating),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn top_rated(&self, limit: usize) -> CoreResult<Vec<ServiceProfile>> {
        let mut profiles = self.get_all().await?;
        profiles.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        profiles.truncate(limit);
        Ok(profiles)
    }
}
