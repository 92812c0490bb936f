//! crates/fixit_core/src/repos/user.rs
//!
//! Repository for user profiles, including the one operation in the system
//! that needs true atomicity: allocating sequential customer numbers from
//! a single counter record. Creation is idempotent per identity token.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{NewUser, User, UserPatch, UserRole};
use crate::error::{CoreError, CoreResult};
use crate::repos::{from_item, json_of, storage, to_item};
use crate::store::{Condition, Delta, EntityStore, Key, StoreError};

const ENTITY: &str = "User";

/// The counter starts here; the first issued customer id is FLOOR + 1.
pub const CUSTOMER_ID_FLOOR: i64 = 10_000_000;

/// Partition key of the single coordination record in the counters table.
const COUNTER_KEY: &str = "customer_id";

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn EntityStore>,
    table: String,
    counter_table: String,
}

impl UserRepository {
    pub fn new(
        store: Arc<dyn EntityStore>,
        table: impl Into<String>,
        counter_table: impl Into<String>,
    ) -> Self {
        Self {
            store,
            table: table.into(),
            counter_table: counter_table.into(),
        }
    }

    /// Allocate the next customer number.
    ///
    /// One conditional-increment storage call seeds the counter on first
    /// use and adds one, atomically: concurrent callers never see the same
    /// value twice, and no read-then-write pair is involved. If the counter
    /// table is unreachable, a timestamp-plus-random id stands in; that
    /// degraded mode drops the uniqueness guarantee and is logged loudly.
    pub async fn generate_customer_id(&self) -> CoreResult<String> {
        let deltas = vec![Delta::Increment {
            attribute: "value".to_owned(),
            start: CUSTOMER_ID_FLOOR,
            by: 1,
        }];
        match self
            .store
            .update(&self.counter_table, &Key::new(COUNTER_KEY), deltas, None)
            .await
        {
            Ok(item) => {
                let value = item.get("value").and_then(Value::as_i64).ok_or_else(|| {
                    CoreError::database(
                        ENTITY,
                        "generate_customer_id",
                        "counter record holds a non-numeric value",
                    )
                })?;
                Ok(value.to_string())
            }
            Err(err @ (StoreError::MissingTable(_) | StoreError::Unavailable(_))) => {
                warn!(
                    error = %err,
                    "customer-id counter unavailable; issuing timestamp-derived id without the uniqueness guarantee"
                );
                let millis = Utc::now().timestamp_millis();
                let noise: i64 = rand::rng().random_range(0..1000);
                Ok((CUSTOMER_ID_FLOOR + millis % 10_000_000 + noise).to_string())
            }
            Err(err) => Err(storage(ENTITY, "generate_customer_id", err)),
        }
    }

    /// Idempotent create keyed by the external identity token. A repeat
    /// call returns the existing record unchanged and allocates nothing.
    pub async fn create(&self, input: NewUser) -> CoreResult<User> {
        if let Some(existing) = self.find_by_id(&input.id).await? {
            info!(id = %existing.id, customer_id = %existing.customer_id,
                "user already exists, returning existing profile");
            return Ok(existing);
        }

        let customer_id = self.generate_customer_id().await?;
        let now = Utc::now();
        let display_name = input
            .display_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| input.email.split('@').next().map(str::to_owned));
        let user = User {
            id: input.id,
            customer_id,
            email: input.email,
            role: input.role,
            display_name,
            phone: None,
            address: None,
            profile_complete: false,
            created_at: now,
            updated_at: now,
        };

        let item = to_item(ENTITY, "create", &user)?;
        match self
            .store
            .put(
                &self.table,
                Key::new(&user.id),
                item,
                Some(Condition::KeyAbsent),
            )
            .await
        {
            Ok(()) => {
                info!(id = %user.id, customer_id = %user.customer_id, role = ?user.role,
                    "created user");
                Ok(user)
            }
            Err(StoreError::ConditionFailed(_)) => {
                // Lost the insert race to a concurrent create for the same
                // identity; the winner's record is canonical.
                self.get_by_id(&user.id).await
            }
            Err(err) => Err(storage(ENTITY, "create", err)),
        }
    }

    /// Partial profile update. `profile_complete` is recomputed over the
    /// merged record (stored fields plus this patch) and is sticky: once
    /// true it never reverts.
    pub async fn update(&self, id: &str, patch: UserPatch) -> CoreResult<User> {
        let current = self.get_by_id(id).await?;

        let mut deltas = Vec::new();
        if let Some(display_name) = &patch.display_name {
            deltas.push(Delta::set("displayName", Value::String(display_name.clone())));
        }
        if let Some(phone) = &patch.phone {
            deltas.push(Delta::set("phone", Value::String(phone.clone())));
        }
        if let Some(address) = &patch.address {
            deltas.push(Delta::set("address", Value::String(address.clone())));
        }
        if let Some(role) = patch.role {
            deltas.push(Delta::set("role", json_of(&role)));
        }

        let complete = profile_now_complete(&current, &patch);
        if complete != current.profile_complete {
            deltas.push(Delta::set("profileComplete", Value::Bool(complete)));
        }
        if deltas.is_empty() {
            return Ok(current);
        }
        deltas.push(Delta::set("updatedAt", json_of(&Utc::now())));

        match self
            .store
            .update(&self.table, &Key::new(id), deltas, Some(Condition::KeyExists))
            .await
        {
            Ok(item) => {
                info!(id, "updated user");
                from_item(ENTITY, "update", item)
            }
            Err(StoreError::ConditionFailed(_)) => Err(CoreError::not_found(ENTITY, id)),
            Err(err) => Err(storage(ENTITY, "update", err)),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> CoreResult<User> {
        match self.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(CoreError::not_found(ENTITY, id)),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        let item = self
            .store
            .get(&self.table, &Key::new(id))
            .await
            .map_err(|err| storage(ENTITY, "get", err))?;
        item.map(|item| from_item(ENTITY, "get", item)).transpose()
    }

    /// Equality query on the customer number; at most one match by
    /// invariant (numbers are issued once and never reused).
    pub async fn find_by_customer_id(&self, customer_id: &str) -> CoreResult<Option<User>> {
        let mut users = self
            .query_eq("customerId", Value::String(customer_id.to_owned()))
            .await?;
        Ok(if users.is_empty() {
            None
        } else {
            Some(users.swap_remove(0))
        })
    }

    pub async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let mut users = self
            .query_eq("email", Value::String(email.to_owned()))
            .await?;
        Ok(if users.is_empty() {
            None
        } else {
            Some(users.swap_remove(0))
        })
    }

    pub async fn get_by_role(&self, role: UserRole) -> CoreResult<Vec<User>> {
        self.query_eq("role", json_of(&role)).await
    }

    pub async fn get_all(&self, limit: usize) -> CoreResult<Vec<User>> {
        let items = self
            .store
            .scan(&self.table)
            .await
            .map_err(|err| storage(ENTITY, "scan", err))?;
        let mut users: Vec<User> = items
            .into_iter()
            .map(|item| from_item(ENTITY, "scan", item))
            .collect::<CoreResult<_>>()?;
        users.truncate(limit);
        Ok(users)
    }

    async fn query_eq(&self, attribute: &str, value: Value) -> CoreResult<Vec<User>> {
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

/// Whether the profile counts as complete after applying `patch` over the
/// stored record. Sticky: a completed profile stays completed.
fn profile_now_complete(stored: &User, patch: &UserPatch) -> bool {
    if stored.profile_complete {
        return true;
    }
    let display_name = patch.display_name.as_ref().or(stored.display_name.as_ref());
    let phone = patch.phone.as_ref().or(stored.phone.as_ref());
    display_name.is_some() && phone.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(display_name: Option<&str>, phone: Option<&str>, complete: bool) -> User {
        let now = Utc::now();
        User {
            id: "auth-1".into(),
            customer_id: "10000001".into(),
            email: "alice@example.com".into(),
            role: UserRole::Customer,
            display_name: display_name.map(Into::into),
            phone: phone.map(Into::into),
            address: None,
            profile_complete: complete,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn completes_when_patch_fills_the_gap() {
        let stored = user(Some("Alice"), None, false);
        let patch = UserPatch {
            phone: Some("555-0100".into()),
            ..Default::default()
        };
        assert!(profile_now_complete(&stored, &patch));
    }

    #[test]
    fn incomplete_while_phone_missing() {
        let stored = user(Some("Alice"), None, false);
        let patch = UserPatch {
            address: Some("12 Elm St".into()),
            ..Default::default()
        };
        assert!(!profile_now_complete(&stored, &patch));
    }

    #[test]
    fn completion_is_sticky() {
        let stored = user(None, None, true);
        let patch = UserPatch::default();
        assert!(profile_now_complete(&stored, &patch));
    }

    #[test]
    fn both_fields_in_one_patch_complete_a_bare_profile() {
        let stored = user(None, None, false);
        let patch = UserPatch {
            display_name: Some("Alice".into()),
            phone: Some("555-0100".into()),
            ..Default::default()
        };
        assert!(profile_now_complete(&stored, &patch));
    }
}
