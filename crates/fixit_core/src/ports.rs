//! crates/fixit_core/src/ports.rs
//!
//! Service contracts for external collaborators. The entity store port
//! lives in `store.rs`; this module holds the remaining ports the core
//! consumes but does not implement.

use async_trait::async_trait;

use crate::domain::ChatTurn;
use crate::error::CoreResult;

/// A generative-text completion service. The adapter owns the system
/// prompt and provider wiring; callers hand over the prior conversation
/// turns plus the new user prompt and get back the reply text.
#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> CoreResult<String>;
}
