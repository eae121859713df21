//! Wire types for the chat endpoint and the transcript model.

use aicc_common::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One recorded stage of an agent run.
///
/// Accepts both the dashboard spelling (`step_name`, `input`, `output`)
/// and the backend's (`name`, `input_preview`, `output_preview`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    #[serde(alias = "name")]
    pub step_name: String,
    #[serde(default, alias = "input_preview", skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default, alias = "output_preview", skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Backend time if provided, otherwise the moment the step was decoded.
    #[serde(default = "Utc::now", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `None` lets the backend pick the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: ConversationId,
    /// Agent that actually handled the request.
    pub agent_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub steps: Vec<AgentStep>,
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub latency_ms: u64,
}

/// One message unit in a session transcript. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Agent that produced an assistant turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<AgentStep>>,
}

impl Turn {
    pub(crate) fn user(id: u64, content: String) -> Self {
        Self::plain(id, Role::User, content)
    }

    pub(crate) fn system(id: u64, content: String) -> Self {
        Self::plain(id, Role::System, content)
    }

    pub(crate) fn assistant(id: u64, response: &ChatResponse) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: response.response.clone(),
            created_at: Utc::now(),
            tokens: Some(response.tokens_used),
            latency_ms: Some(response.latency_ms),
            agent_id: Some(response.agent_id.clone()),
            steps: Some(response.steps.clone()),
        }
    }

    fn plain(id: u64, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            created_at: Utc::now(),
            tokens: None,
            latency_ms: None,
            agent_id: None,
            steps: None,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps as the backend emits them: RFC 3339, or naive ISO 8601
/// which is taken to be UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub(crate) fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub(crate) mod option {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_str(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp '{raw}'"))
                }),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn request_omits_absent_fields() {
        let req = ChatRequest {
            message: "Hello".into(),
            agent_id: None,
            conversation_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Hello" }));
    }

    #[test]
    fn request_carries_agent_and_conversation() {
        let req = ChatRequest {
            message: "status?".into(),
            agent_id: Some("incident-agent".into()),
            conversation_id: Some(ConversationId::from("c1")),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["agent_id"], "incident-agent");
        assert_eq!(json["conversation_id"], "c1");
    }

    #[test]
    fn response_decodes_backend_step_shape() {
        let json = r#"{
            "response": "Found 2 documents.",
            "conversation_id": "c1",
            "agent_id": "doc",
            "steps": [
                {"name": "retrieve_docs", "status": "completed", "duration_ms": 42,
                 "input_preview": "vpn setup", "output_preview": "2 chunks"}
            ],
            "tokens_used": 57,
            "latency_ms": 900
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.steps.len(), 1);
        let step = &resp.steps[0];
        assert_eq!(step.step_name, "retrieve_docs");
        assert_eq!(step.status.as_deref(), Some("completed"));
        assert_eq!(step.duration_ms, Some(42));
        assert_eq!(step.input, Some(serde_json::json!("vpn setup")));
        assert_eq!(step.output, Some(serde_json::json!("2 chunks")));
    }

    #[test]
    fn response_decodes_dashboard_step_shape() {
        let json = r#"{
            "response": "ok",
            "conversation_id": "c9",
            "agent_id": "slack",
            "steps": [
                {"step_name": "summarize", "input": {"messages": 12},
                 "output": {"summary": "..."}, "timestamp": "2024-05-01T10:15:30Z"}
            ]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        let step = &resp.steps[0];
        assert_eq!(step.step_name, "summarize");
        assert_eq!(step.input.as_ref().unwrap()["messages"], 12);
        assert_eq!(step.timestamp.hour(), 10);
        assert_eq!(resp.tokens_used, 0);
        assert_eq!(resp.latency_ms, 0);
    }

    #[test]
    fn response_treats_null_steps_as_empty() {
        let json = r#"{"response":"Hi","conversation_id":"c1","agent_id":"a1","steps":null}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.steps.is_empty());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = timestamp::parse("2024-03-02T08:00:01.250000").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 8);
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn assistant_turn_copies_response_metrics() {
        let resp = ChatResponse {
            response: "Hi".into(),
            conversation_id: ConversationId::from("c1"),
            agent_id: "a1".into(),
            steps: Vec::new(),
            tokens_used: 5,
            latency_ms: 120,
        };
        let turn = Turn::assistant(2, &resp);
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Hi");
        assert_eq!(turn.tokens, Some(5));
        assert_eq!(turn.latency_ms, Some(120));
        assert_eq!(turn.agent_id.as_deref(), Some("a1"));
        assert_eq!(turn.steps, Some(Vec::new()));
    }
}
