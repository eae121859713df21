//! Backend API connection settings.

use serde::{Deserialize, Serialize};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Where the command center backend lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Versioned API root, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Whole-request timeout. Unset leaves the HTTP client's default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash, ready for path joining.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
