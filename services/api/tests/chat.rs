//! Chat history store: per-session ordering, bounded reads, and clearing.

mod common;

use std::time::Duration;

use fixit_core::domain::ChatRole;

#[tokio::test]
async fn history_comes_back_oldest_first() {
    let store = common::store();
    let chat = common::chat_repo(&store);

    for (role, text) in [
        (ChatRole::User, "How do I fix a leaky faucet?"),
        (ChatRole::Model, "Start by shutting off the water supply."),
        (ChatRole::User, "Done. What next?"),
    ] {
        chat.add_message("s1", role, text).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let history = chat.history("s1", 50).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].text, "How do I fix a leaky faucet?");
    assert_eq!(history[2].text, "Done. What next?");
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[tokio::test]
async fn history_limit_keeps_the_oldest_messages() {
    let store = common::store();
    let chat = common::chat_repo(&store);
    for i in 0..5 {
        chat.add_message("s1", ChatRole::User, &format!("message {i}"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let bounded = chat.history("s1", 2).await.unwrap();
    assert_eq!(bounded.len(), 2);
    assert_eq!(bounded[0].text, "message 0");
    assert_eq!(bounded[1].text, "message 1");
}

#[tokio::test]
async fn sessions_are_isolated() {
    let store = common::store();
    let chat = common::chat_repo(&store);
    chat.add_message("s1", ChatRole::User, "hi").await.unwrap();
    chat.add_message("s2", ChatRole::User, "hello").await.unwrap();

    assert_eq!(chat.history("s1", 50).await.unwrap().len(), 1);
    assert_eq!(chat.history("s2", 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_empties_only_the_target_session() {
    let store = common::store();
    let chat = common::chat_repo(&store);
    chat.add_message("s1", ChatRole::User, "hi").await.unwrap();
    chat.add_message("s1", ChatRole::Model, "hello!").await.unwrap();
    chat.add_message("s2", ChatRole::User, "other").await.unwrap();

    chat.clear("s1").await.unwrap();
    assert!(chat.history("s1", 50).await.unwrap().is_empty());
    assert_eq!(chat.history("s2", 50).await.unwrap().len(), 1);

    // Clearing an already-empty session is fine.
    chat.clear("s1").await.unwrap();
}

#[tokio::test]
async fn turns_project_roles_and_text() {
    let store = common::store();
    let chat = common::chat_repo(&store);
    chat.add_message("s1", ChatRole::User, "question").await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    chat.add_message("s1", ChatRole::Model, "answer").await.unwrap();

    let turns = chat.turns("s1").await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, ChatRole::User);
    assert_eq!(turns[0].text, "question");
    assert_eq!(turns[1].role, ChatRole::Model);
}
