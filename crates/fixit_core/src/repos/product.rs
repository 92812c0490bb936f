//! crates/fixit_core/src/repos/product.rs
//!
//! Repository for catalog products. Plain CRUD plus read-side filtering;
//! no cross-entity invariants. Updates are last-write-wins: two concurrent
//! writers to the same product silently race, by design.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::{NewProduct, Product, ProductCategory, ProductPatch};
use crate::error::{CoreError, CoreResult};
use crate::repos::{from_item, json_of, placeholder_image, storage, to_item, validate_rating};
use crate::store::{Condition, Delta, EntityStore, Key, StoreError};

const ENTITY: &str = "Product";

#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn EntityStore>,
    table: String,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn EntityStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub async fn create(&self, input: NewProduct) -> CoreResult<Product> {
        if input.price <= 0.0 {
            return Err(CoreError::Validation(format!(
                "price must be positive, got {}",
                input.price
            )));
        }
        if let Some(rating) = input.rating {
            validate_rating(rating)?;
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            price: input.price,
            category: input.category,
            image: input.image.unwrap_or_else(|| placeholder_image(300)),
            description: input.description,
            rating: input.rating.unwrap_or(0.0),
            created_at: Some(now),
            updated_at: Some(now),
        };

        let item = to_item(ENTITY, "create", &product)?;
        self.store
            .put(&self.table, Key::new(&product.id), item, None)
            .await
            .map_err(|err| storage(ENTITY, "create", err))?;
        info!(id = %product.id, "created product");
        Ok(product)
    }

    /// Partial update; only supplied fields are written. Fails with
    /// `NotFound` when the id does not exist.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> CoreResult<Product> {
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        if let Some(price) = patch.price {
            if price <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "price must be positive, got {price}"
                )));
            }
        }

        let mut deltas = Vec::new();
        if let Some(name) = patch.name {
            deltas.push(Delta::set("name", Value::String(name)));
        }
        if let Some(price) = patch.price {
            deltas.push(Delta::set("price", Value::from(price)));
        }
        if let Some(category) = patch.category {
            deltas.push(Delta::set("category", json_of(&category)));
        }
        if let Some(image) = patch.image {
            deltas.push(Delta::set("image", Value::String(image)));
        }
        if let Some(description) = patch.description {
            deltas.push(Delta::set("description", Value::String(description)));
        }
        if let Some(rating) = patch.rating {
            deltas.push(Delta::set("rating", Value::from(rating)));
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

    pub async fn get_by_id(&self, id: &str) -> CoreResult<Product> {
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

    pub async fn get_all(&self) -> CoreResult<Vec<Product>> {
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
        // Existence check first so a missing id surfaces as NotFound.
        self.get_by_id(id).await?;
        self.store
            .delete(&self.table, &Key::new(id))
            .await
            .map_err(|err| storage(ENTITY, "delete", err))?;
        info!(id, "deleted product");
        Ok(())
    }

    /// Exact, case-sensitive category match.
    pub async fn get_by_category(&self, category: ProductCategory) -> CoreResult<Vec<Product>> {
        let items = self
            .store
            .query(&self.table, &[("category", json_of(&category))])
            .await
            .map_err(|err| storage(ENTITY, "query", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "query", item))
            .collect()
    }

    pub async fn top_rated(&self, limit: usize) -> CoreResult<Vec<Product>> {
        let mut products = self.get_all().await?;
        products.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        products.truncate(limit);
        Ok(products)
    }

    /// Case-insensitive substring search over name and description. A full
    /// scan is fine at catalog sizes; no index is kept for this.
    pub async fn search(&self, term: &str) -> CoreResult<Vec<Product>> {
        let needle = term.to_lowercase();
        let products = self.get_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect())
    }
}
