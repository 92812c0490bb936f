//! services/api/src/adapters/assistant.rs
//!
//! Adapter for the Google Gemini `generateContent` API, implementing the
//! `AssistantService` port. Owns the system prompt and request shaping;
//! the route layer decides how failures are presented to users.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fixit_core::domain::{ChatRole, ChatTurn};
use fixit_core::error::{CoreError, CoreResult};
use fixit_core::ports::AssistantService;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for FixitHub, a home repair and maintenance platform. \
You help users with:\n\
- DIY repair guidance and step-by-step instructions\n\
- Tool recommendations and usage tips\n\
- Safety advice for home repairs\n\
- When to call a professional vs. DIY\n\
- Cost estimates and project planning\n\
- Material recommendations\n\n\
Be friendly, practical, and safety-conscious. If a task seems dangerous or requires \
professional licensing (like major electrical or plumbing work), recommend hiring a \
professional from our platform.";

const SYSTEM_ACK: &str = "Understood! I'm ready to help with home repair questions.";

/// Reply used when the provider returns an empty candidate list.
const EMPTY_REPLY: &str =
    "I'm having trouble thinking of a solution right now. Please try again.";

pub struct GeminiAssistant {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAssistant {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint (local stub servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role: match role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            },
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[async_trait]
impl AssistantService for GeminiAssistant {
    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> CoreResult<String> {
        // The system prompt rides as a primed user/model exchange ahead of
        // the real conversation, matching the generateContent turn format.
        let mut contents = vec![
            Content::new(ChatRole::User, SYSTEM_PROMPT),
            Content::new(ChatRole::Model, SYSTEM_ACK),
        ];
        for turn in history {
            contents.push(Content::new(turn.role, turn.text.clone()));
        }
        contents.push(Content::new(ChatRole::User, prompt));

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(|err| CoreError::database("Assistant", "generate", err))?
            .error_for_status()
            .map_err(|err| CoreError::database("Assistant", "generate", err))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| CoreError::database("Assistant", "generate", err))?;

        let text = body
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    Some(candidates.swap_remove(0))
                }
            })
            .and_then(|candidate| candidate.content.parts)
            .and_then(|mut parts| {
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.swap_remove(0).text)
                }
            });

        Ok(text.unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}
