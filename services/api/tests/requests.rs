//! Service-request lifecycle: OPEN -> IN_PROGRESS -> COMPLETED, with
//! out-of-order transitions rejected.

mod common;

use std::time::Duration;

use fixit_core::domain::{NewServiceRequest, RequestStatus};
use fixit_core::error::CoreError;

fn leaky_faucet() -> NewServiceRequest {
    NewServiceRequest {
        customer_id: "c1".to_string(),
        customer_name: "Alice".to_string(),
        description: "Leaky faucet".to_string(),
        category: "Plumbing".to_string(),
    }
}

#[tokio::test]
async fn new_requests_start_open_and_unassigned() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let request = requests.create(leaky_faucet()).await.unwrap();

    assert_eq!(request.status, RequestStatus::Open);
    assert!(request.professional_id.is_none());
    assert!(!request.date.is_empty());
    assert_eq!(request.customer_name, "Alice");
}

#[tokio::test]
async fn full_lifecycle_open_accept_complete() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let request = requests.create(leaky_faucet()).await.unwrap();

    let accepted = requests.accept_job(&request.id, "p3").await.unwrap();
    assert_eq!(accepted.status, RequestStatus::InProgress);
    assert_eq!(accepted.professional_id.as_deref(), Some("p3"));

    let completed = requests.complete_job(&request.id).await.unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(completed.professional_id.as_deref(), Some("p3"));
}

#[tokio::test]
async fn accepting_twice_is_a_conflict() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let request = requests.create(leaky_faucet()).await.unwrap();
    requests.accept_job(&request.id, "p3").await.unwrap();

    let err = requests.accept_job(&request.id, "p4").await.unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    // The original assignment stands.
    let current = requests.get_by_id(&request.id).await.unwrap();
    assert_eq!(current.professional_id.as_deref(), Some("p3"));
}

#[tokio::test]
async fn completing_out_of_order_is_rejected() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let request = requests.create(leaky_faucet()).await.unwrap();

    // Straight to complete without an accept.
    assert!(matches!(
        requests.complete_job(&request.id).await.unwrap_err(),
        CoreError::Conflict(_)
    ));

    requests.accept_job(&request.id, "p3").await.unwrap();
    requests.complete_job(&request.id).await.unwrap();

    // COMPLETED is terminal.
    assert!(matches!(
        requests.complete_job(&request.id).await.unwrap_err(),
        CoreError::Conflict(_)
    ));
    assert!(matches!(
        requests.accept_job(&request.id, "p5").await.unwrap_err(),
        CoreError::Conflict(_)
    ));
}

#[tokio::test]
async fn transitions_on_missing_requests_are_not_found() {
    let store = common::store();
    let requests = common::request_repo(&store);
    assert!(matches!(
        requests.accept_job("missing", "p3").await.unwrap_err(),
        CoreError::NotFound { .. }
    ));
    assert!(matches!(
        requests.complete_job("missing").await.unwrap_err(),
        CoreError::NotFound { .. }
    ));
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let mut input = leaky_faucet();
    input.description = "   ".to_string();
    assert!(matches!(
        requests.create(input).await.unwrap_err(),
        CoreError::Validation(_)
    ));
}

#[tokio::test]
async fn recent_returns_newest_first() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let mut ids = Vec::new();
    for description in ["first", "second", "third"] {
        let mut input = leaky_faucet();
        input.description = description.to_string();
        ids.push(requests.create(input).await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let recent = requests.recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, ids[2]);
    assert_eq!(recent[1].id, ids[1]);
}

#[tokio::test]
async fn read_side_filters() {
    let store = common::store();
    let requests = common::request_repo(&store);
    let first = requests.create(leaky_faucet()).await.unwrap();
    let mut other = leaky_faucet();
    other.customer_id = "c2".to_string();
    other.category = "Electrical".to_string();
    requests.create(other).await.unwrap();
    requests.accept_job(&first.id, "p3").await.unwrap();

    assert_eq!(requests.get_by_customer("c1").await.unwrap().len(), 1);
    assert_eq!(requests.get_by_professional("p3").await.unwrap().len(), 1);
    assert_eq!(requests.get_by_category("Electrical").await.unwrap().len(), 1);
    assert_eq!(requests.get_open().await.unwrap().len(), 1);
    assert_eq!(
        requests
            .get_by_status(RequestStatus::InProgress)
            .await
            .unwrap()
            .len(),
        1
    );
}
