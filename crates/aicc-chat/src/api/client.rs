//! HTTP client struct, URL building, and response/error mapping.

use std::time::Duration;

use aicc_common::new_correlation_id;
use aicc_config::ApiConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ChatError;

pub(crate) const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// REST client for the command center backend.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::Client(e.to_string()))?;

        Ok(Self {
            base_url: config.trimmed_base_url().to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a prepared request and decode a JSON success body.
    ///
    /// Non-2xx responses become [`ChatError::Api`] carrying the body's
    /// `detail` message when there is one.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChatError> {
        let request_id = new_correlation_id();
        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        debug!(request_id = %request_id, status = %status, "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            if detail.is_none() && !body.is_empty() {
                let preview = body.chars().take(200).collect::<String>();
                debug!(request_id = %request_id, body = %preview, "error body without detail");
            }
            return Err(ChatError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<T>().await.map_err(map_transport_error)
    }
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else if e.is_decode() {
        ChatError::Parse(e.to_string())
    } else {
        ChatError::Network(e.to_string())
    }
}

/// Pull a readable message out of a JSON error body.
///
/// Handles `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "..."}, ...]}`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}
