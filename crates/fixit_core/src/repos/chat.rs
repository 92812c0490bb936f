//! crates/fixit_core/src/repos/chat.rs
//!
//! Append-only per-session chat log. Messages are keyed by
//! (session_id, timestamp); clearing a session deletes its messages one by
//! one and is best-effort, not transactional.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{ChatMessage, ChatRole, ChatTurn};
use crate::error::CoreResult;
use crate::repos::{from_item, storage, to_item};
use crate::store::{EntityStore, Key};

const ENTITY: &str = "ChatMessage";

/// Default window of history handed back to callers.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Upper bound on messages read during a clear.
const CLEAR_CAP: usize = 1000;

#[derive(Clone)]
pub struct ChatRepository {
    store: Arc<dyn EntityStore>,
    table: String,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn EntityStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Append one message; the microsecond RFC-3339 timestamp is both the
    /// sort key and the ordering key for reads.
    pub async fn add_message(
        &self,
        session_id: &str,
        role: ChatRole,
        text: &str,
    ) -> CoreResult<ChatMessage> {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_owned(),
            role,
            text: text.to_owned(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let item = to_item(ENTITY, "add_message", &message)?;
        self.store
            .put(
                &self.table,
                Key::with_sort(session_id, &message.timestamp),
                item,
                None,
            )
            .await
            .map_err(|err| storage(ENTITY, "add_message", err))?;
        debug!(session_id, role = ?role, "added chat message");
        Ok(message)
    }

    /// Oldest-first history for a session, bounded by `limit`.
    pub async fn history(&self, session_id: &str, limit: usize) -> CoreResult<Vec<ChatMessage>> {
        let items = self
            .store
            .query(
                &self.table,
                &[("sessionId", Value::String(session_id.to_owned()))],
            )
            .await
            .map_err(|err| storage(ENTITY, "history", err))?;
        let mut messages: Vec<ChatMessage> = items
            .into_iter()
            .map(|item| from_item(ENTITY, "history", item))
            .collect::<CoreResult<_>>()?;
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages.truncate(limit);
        Ok(messages)
    }

    /// History projected to (role, text) turns for the assistant port.
    pub async fn turns(&self, session_id: &str) -> CoreResult<Vec<ChatTurn>> {
        let messages = self.history(session_id, DEFAULT_HISTORY_LIMIT).await?;
        Ok(messages.iter().map(ChatTurn::from).collect())
    }

    /// Delete every message in a session, one item at a time. A concurrent
    /// append may or may not survive; callers get no stronger guarantee.
    pub async fn clear(&self, session_id: &str) -> CoreResult<()> {
        let messages = self.history(session_id, CLEAR_CAP).await?;
        for message in &messages {
            self.store
                .delete(
                    &self.table,
                    &Key::with_sort(&message.session_id, &message.timestamp),
                )
                .await
                .map_err(|err| storage(ENTITY, "clear", err))?;
        }
        info!(session_id, count = messages.len(), "cleared chat session");
        Ok(())
    }
}
