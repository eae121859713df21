//! REST client for the command center backend.
//!
//! [`ApiClient`] implements [`crate::ChatBackend`] over `POST /chat` and
//! adds the read-only agent and conversation listings.

mod chat;
mod client;
mod dashboard;

pub use client::ApiClient;
pub use dashboard::{
    AgentInfo, AgentStats, ConversationDetail, ConversationFilter, ConversationMessage,
    ConversationSummary, GraphEdge, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
