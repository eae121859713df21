//! ChatBackend implementation for ApiClient (`POST /chat`).

use async_trait::async_trait;
use tracing::debug;

use crate::{ChatBackend, ChatError, ChatRequest, ChatResponse};

use super::client::ApiClient;

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        debug!(
            agent = request.agent_id.as_deref().unwrap_or("auto"),
            conversation = ?request.conversation_id.as_ref().map(|c| c.as_str()),
            "chat request"
        );

        let builder = self.http.post(self.url("chat")).json(request);
        let response: ChatResponse = self.send_json(builder).await?;

        debug!(
            agent = %response.agent_id,
            steps = response.steps.len(),
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "chat response"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aicc_config::ApiConfig;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: format!("{}/api/v1", server.uri()),
            timeout_secs: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn send_chat_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .and(header_exists("x-request-id"))
            .and(body_json(serde_json::json!({ "message": "Hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Hi",
                "conversation_id": "c1",
                "agent_id": "a1",
                "steps": [],
                "tokens_used": 5,
                "latency_ms": 120
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let resp = client
            .send_chat(&ChatRequest {
                message: "Hello".into(),
                agent_id: None,
                conversation_id: None,
            })
            .await
            .unwrap();

        assert_eq!(resp.response, "Hi");
        assert_eq!(resp.conversation_id.as_str(), "c1");
        assert_eq!(resp.agent_id, "a1");
        assert_eq!(resp.tokens_used, 5);
        assert_eq!(resp.latency_ms, 120);
    }

    #[tokio::test]
    async fn send_chat_forwards_agent_and_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .and(body_json(serde_json::json!({
                "message": "disk full on db-2",
                "agent_id": "incident-agent",
                "conversation_id": "c7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Severity: high",
                "conversation_id": "c7",
                "agent_id": "incident"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .send_chat(&ChatRequest {
                message: "disk full on db-2".into(),
                agent_id: Some("incident-agent".into()),
                conversation_id: Some("c7".into()),
            })
            .await
            .unwrap();
        assert_eq!(resp.agent_id, "incident");
    }

    #[tokio::test]
    async fn send_chat_extracts_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "detail": "Unknown agent: nope" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_chat(&ChatRequest {
                message: "hi".into(),
                agent_id: Some("nope".into()),
                conversation_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ChatError::Api {
                status: 400,
                detail: Some("Unknown agent: nope".into())
            }
        );
    }

    #[tokio::test]
    async fn send_chat_server_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_chat(&ChatRequest {
                message: "hi".into(),
                agent_id: None,
                conversation_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ChatError::Api {
                status: 503,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn send_chat_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_chat(&ChatRequest {
                message: "hi".into(),
                agent_id: None,
                conversation_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Parse(_)));
    }

    #[tokio::test]
    async fn send_chat_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_secs(3))
                    .set_body_json(serde_json::json!({
                        "response": "late",
                        "conversation_id": "c1",
                        "agent_id": "doc"
                    })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig {
            base_url: format!("{}/api/v1", server.uri()),
            timeout_secs: Some(1),
        })
        .unwrap();

        let err = client
            .send_chat(&ChatRequest {
                message: "hi".into(),
                agent_id: None,
                conversation_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::Timeout);
    }

    #[tokio::test]
    async fn send_chat_connection_refused_is_network_error() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1/api/v1".into(),
            timeout_secs: None,
        })
        .unwrap();

        let err = client
            .send_chat(&ChatRequest {
                message: "hi".into(),
                agent_id: None,
                conversation_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Network(_)));
    }
}
