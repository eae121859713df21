//! Read-only agent and conversation listings.

use aicc_common::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::timestamp;
use crate::ChatError;

use super::client::ApiClient;

/// Default and maximum page sizes accepted by `GET /conversations`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub total_runs: u64,
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub graph_nodes: Vec<String>,
    #[serde(default)]
    pub graph_edges: Vec<GraphEdge>,
    #[serde(default)]
    pub stats: Option<AgentStats>,
    #[serde(default, with = "timestamp::option")]
    pub last_deployed: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AgentList {
    items: Vec<AgentInfo>,
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl<T> Page<T> {
    /// Whether more items exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.skip.saturating_add(self.items.len() as u64) < self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub latest_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub tokens: Option<u64>,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub total_latency_ms: u64,
}

/// Query for `GET /conversations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationFilter {
    pub agent_id: Option<String>,
    pub status: Option<String>,
    pub channel: Option<String>,
    pub skip: u64,
    pub limit: u32,
}

impl Default for ConversationFilter {
    fn default() -> Self {
        Self {
            agent_id: None,
            status: None,
            channel: None,
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConversationFilter {
    /// Query-string pairs, with `limit` clamped to what the backend accepts.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        let optional = [
            ("agent_id", &self.agent_id),
            ("status", &self.status),
            ("channel", &self.channel),
        ];
        for (key, value) in optional {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }
}

impl ApiClient {
    /// `GET /agents`
    pub async fn list_agents(&self) -> Result<Vec<AgentInfo>, ChatError> {
        let list: AgentList = self.send_json(self.http.get(self.url("agents"))).await?;
        Ok(list.items)
    }

    /// `GET /conversations`
    pub async fn list_conversations(
        &self,
        filter: &ConversationFilter,
    ) -> Result<Page<ConversationSummary>, ChatError> {
        let builder = self
            .http
            .get(self.url("conversations"))
            .query(&filter.query_pairs());
        self.send_json(builder).await
    }

    /// `GET /conversations/{id}`
    pub async fn get_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<ConversationDetail, ChatError> {
        let path = format!("conversations/{}", id.as_str());
        self.send_json(self.http.get(self.url(&path))).await
    }
}
