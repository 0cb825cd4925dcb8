//! Completion service trait definitions
//!
//! Defines the `CompletionService` trait every chat completion provider
//! implements, and the role-tagged message types it exchanges.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Request / Reply
// ─────────────────────────────────────────────────────────────────

/// One non-streaming completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation sent to the model
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,
}

/// What came back from the model
///
/// `content` is `None` when the response carried no extractable text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReply {
    pub content: Option<String>,
}

impl CompletionReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }
}

// ─────────────────────────────────────────────────────────────────
// CompletionService Trait
// ─────────────────────────────────────────────────────────────────

/// A hosted chat completion endpoint
///
/// Implementations hold immutable configuration only, so one instance is
/// built at startup and shared by every request.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Provider name for logs (e.g., "openai", "mock")
    fn name(&self) -> &'static str;

    /// Submit one request and wait for the reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply>;
}

/// Type alias for a shared service reference
pub type SharedCompletionService = Arc<dyn CompletionService>;
