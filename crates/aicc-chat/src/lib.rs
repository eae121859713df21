//! Agent chat client for the AI Command Center.
//!
//! Provides:
//! - the [`ChatBackend`] seam and its HTTP implementation, [`ApiClient`]
//! - [`ChatSession`], a serialized transcript manager with listener notification
//! - static agent execution graphs for step highlighting
//! - per-agent token and latency accounting

pub mod api;
pub mod graph;
pub mod session;
pub mod types;
pub mod usage;

use async_trait::async_trait;

pub use aicc_common::ConversationId;
pub use api::{ApiClient, ConversationFilter};
pub use graph::{graph_for_agent, AgentGraph, GraphNode, NodeKind};
pub use session::{ChatSession, ListenerId, SessionPhase, SessionSnapshot, SkipReason, SubmitOutcome};
pub use types::{AgentStep, ChatRequest, ChatResponse, Role, Turn};
pub use usage::{UsageTotals, UsageTracker};

/// The single RPC the session manager depends on.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Api { status: u16, detail: Option<String> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Timeout")]
    Timeout,
    #[error("Client error: {0}")]
    Client(String),
}

impl ChatError {
    /// Human-readable message supplied by the server, if the error body had one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ChatError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<ChatError> for aicc_common::CommandCenterError {
    fn from(err: ChatError) -> Self {
        aicc_common::CommandCenterError::Chat(err.to_string())
    }
}
