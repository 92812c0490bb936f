//! crates/fixit_core/src/repos/request.rs
//!
//! Repository for job requests and their status lifecycle:
//! OPEN --accept(professional)--> IN_PROGRESS --complete()--> COMPLETED.
//! Out-of-order transitions are rejected with `Conflict`; the check rides
//! on a conditional write so a lost race surfaces the same way.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::{NewServiceRequest, RequestStatus, ServiceRequest};
use crate::error::{CoreError, CoreResult};
use crate::repos::{from_item, json_of, storage, to_item};
use crate::store::{Condition, Delta, EntityStore, Key, StoreError};

const ENTITY: &str = "ServiceRequest";

#[derive(Clone)]
pub struct ServiceRequestRepository {
    store: Arc<dyn EntityStore>,
    table: String,
}

impl ServiceRequestRepository {
    pub fn new(store: Arc<dyn EntityStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Create a request in state OPEN with no professional assigned.
    pub async fn create(&self, input: NewServiceRequest) -> CoreResult<ServiceRequest> {
        for (field, value) in [
            ("customerId", &input.customer_id),
            ("customerName", &input.customer_name),
            ("description", &input.description),
            ("category", &input.category),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} is required")));
            }
        }

        let now = Utc::now();
        let request = ServiceRequest {
            id: Uuid::new_v4().to_string(),
            customer_id: input.customer_id,
            // Snapshot of the requester's name; deliberately not kept in
            // sync with later profile edits.
            customer_name: input.customer_name,
            description: input.description,
            category: input.category,
            status: RequestStatus::Open,
            date: now.format("%-m/%-d/%Y").to_string(),
            professional_id: None,
            created_at: now,
            updated_at: now,
        };

        let item = to_item(ENTITY, "create", &request)?;
        self.store
            .put(&self.table, Key::new(&request.id), item, None)
            .await
            .map_err(|err| storage(ENTITY, "create", err))?;
        info!(id = %request.id, customer_id = %request.customer_id, "created service request");
        Ok(request)
    }

    /// A professional accepts an OPEN request, moving it to IN_PROGRESS.
    pub async fn accept_job(&self, id: &str, professional_id: &str) -> CoreResult<ServiceRequest> {
        let deltas = vec![
            Delta::set("status", json_of(&RequestStatus::InProgress)),
            Delta::set("professionalId", Value::String(professional_id.to_owned())),
            Delta::set("updatedAt", json_of(&Utc::now())),
        ];
        self.transition(id, "accept_job", RequestStatus::Open, deltas)
            .await
    }

    /// The assigned professional marks an IN_PROGRESS request COMPLETED.
    pub async fn complete_job(&self, id: &str) -> CoreResult<ServiceRequest> {
        let deltas = vec![
            Delta::set("status", json_of(&RequestStatus::Completed)),
            Delta::set("updatedAt", json_of(&Utc::now())),
        ];
        self.transition(id, "complete_job", RequestStatus::InProgress, deltas)
            .await
    }

    /// Guarded status write: the store checks `status == expected` and
    /// applies the deltas atomically. A failed condition is disambiguated
    /// by re-reading: missing id -> NotFound, wrong state -> Conflict.
    async fn transition(
        &self,
        id: &str,
        operation: &'static str,
        expected: RequestStatus,
        deltas: Vec<Delta>,
    ) -> CoreResult<ServiceRequest> {
        let condition = Condition::AttributeEquals {
            attribute: "status".to_owned(),
            value: json_of(&expected),
        };
        match self
            .store
            .update(&self.table, &Key::new(id), deltas, Some(condition))
            .await
        {
            Ok(item) => {
                info!(id, operation, "service request transitioned");
                from_item(ENTITY, operation, item)
            }
            Err(StoreError::ConditionFailed(_)) => {
                let current = self
                    .store
                    .get(&self.table, &Key::new(id))
                    .await
                    .map_err(|err| storage(ENTITY, operation, err))?;
                match current {
                    None => Err(CoreError::not_found(ENTITY, id)),
                    Some(item) => {
                        let request: ServiceRequest = from_item(ENTITY, operation, item)?;
                        Err(CoreError::Conflict(format!(
                            "cannot {operation} request {id}: status is {}, expected {expected}",
                            request.status
                        )))
                    }
                }
            }
            Err(err) => Err(storage(ENTITY, operation, err)),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> CoreResult<ServiceRequest> {
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

    pub async fn get_all(&self) -> CoreResult<Vec<ServiceRequest>> {
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

    pub async fn get_by_customer(&self, customer_id: &str) -> CoreResult<Vec<ServiceRequest>> {
        self.query_eq("customerId", Value::String(customer_id.to_owned()))
            .await
    }

    pub async fn get_by_professional(
        &self,
        professional_id: &str,
    ) -> CoreResult<Vec<ServiceRequest>> {
        self.query_eq("professionalId", Value::String(professional_id.to_owned()))
            .await
    }

    pub async fn get_by_status(&self, status: RequestStatus) -> CoreResult<Vec<ServiceRequest>> {
        self.query_eq("status", json_of(&status)).await
    }

    /// Convenience alias for the OPEN status filter.
    pub async fn get_open(&self) -> CoreResult<Vec<ServiceRequest>> {
        self.get_by_status(RequestStatus::Open).await
    }

    /// Free-text equality on the category field.
    pub async fn get_by_category(&self, category: &str) -> CoreResult<Vec<ServiceRequest>> {
        self.query_eq("category", Value::String(category.to_owned()))
            .await
    }

    /// Newest first by creation time; ties keep their scan order.
    pub async fn recent(&self, limit: usize) -> CoreResult<Vec<ServiceRequest>> {
        let mut requests = self.get_all().await?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests.truncate(limit);
        Ok(requests)
    }

    async fn query_eq(&self, attribute: &str, value: Value) -> CoreResult<Vec<ServiceRequest>> {
        let items = self
            .store
            .query(&self.table, &[(attribute, value)])
            .await
            .map_err(|err| storage(ENTITY, "query", err))?;
        items
            .into_iter()
            .map(|item| from_item(ENTITY, "query", item))
            .collect()
    }
}
