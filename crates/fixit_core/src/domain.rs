//! crates/fixit_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs serialize to the camelCase JSON documents held by the
//! entity store; they carry no storage or transport logic themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed catalog categories for store products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Power Tools")]
    PowerTools,
    #[serde(rename = "Hand Tools")]
    HandTools,
    Electrical,
    Plumbing,
    Safety,
}

/// A catalog item sold through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: ProductCategory,
    pub image: String,
    pub description: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a product. Missing image/rating get defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: ProductCategory,
    pub image: Option<String>,
    pub description: String,
    pub rating: Option<f64>,
}

/// Partial update for a product; only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

/// Fixed trades for service professionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profession {
    Electrician,
    Carpenter,
    Plumber,
    #[serde(rename = "HVAC")]
    Hvac,
    #[serde(rename = "General Handyman")]
    GeneralHandyman,
}

/// Public listing for a service professional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProfile {
    pub id: String,
    pub name: String,
    pub profession: Profession,
    /// Hourly rate in the platform currency.
    pub rate: f64,
    pub rating: f64,
    pub image: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceProfile {
    pub name: String,
    pub profession: Profession,
    pub rate: f64,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProfilePatch {
    pub name: Option<String>,
    pub profession: Option<Profession>,
    pub rate: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub available: Option<bool>,
}

/// Lifecycle of a job request. Transitions are one-way:
/// OPEN -> IN_PROGRESS -> COMPLETED, with no path back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Open,
    InProgress,
    Completed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// A customer's posted job request.
///
/// `customer_name` is a snapshot taken at creation time and is not kept in
/// sync with later profile edits. `customer_id` and `professional_id` are
/// not validated against the user/profile tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub description: String,
    /// Free-form category text; not checked against the profession enum.
    pub category: String,
    pub status: RequestStatus,
    /// Human-facing creation date, e.g. "3/14/2026".
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRequest {
    pub customer_id: String,
    pub customer_name: String,
    pub description: String,
    pub category: String,
}

/// Persisted account roles. A signed-out visitor is a purely client-side
/// "guest" state and is never written to the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Professional,
}

/// A user profile, keyed by the identity token issued by the external
/// auth provider. `customer_id` is assigned exactly once at creation and
/// is never changed or reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub customer_id: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Identity token from the auth provider; primary key.
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
}

/// Which side of the conversation produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message in an assistant conversation. Keyed by
/// (session_id, timestamp); the RFC-3339 timestamp string doubles as the
/// per-session ordering key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: String,
}

/// A (role, text) pair handed to the assistant port as conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_match_catalog() {
        let json = serde_json::to_value(ProductCategory::PowerTools).unwrap();
        assert_eq!(json, serde_json::json!("Power Tools"));
        let parsed: ProductCategory =
            serde_json::from_value(serde_json::json!("Safety")).unwrap();
        assert_eq!(parsed, ProductCategory::Safety);
    }

    #[test]
    fn profession_wire_names() {
        assert_eq!(
            serde_json::to_value(Profession::GeneralHandyman).unwrap(),
            serde_json::json!("General Handyman")
        );
        assert_eq!(
            serde_json::to_value(Profession::Hvac).unwrap(),
            serde_json::json!("HVAC")
        );
    }

    #[test]
    fn status_and_roles_use_screaming_wire_values() {
        assert_eq!(
            serde_json::to_value(RequestStatus::InProgress).unwrap(),
            serde_json::json!("IN_PROGRESS")
        );
        assert_eq!(
            serde_json::to_value(UserRole::Professional).unwrap(),
            serde_json::json!("PROFESSIONAL")
        );
        assert_eq!(
            serde_json::to_value(ChatRole::Model).unwrap(),
            serde_json::json!("model")
        );
    }
}
