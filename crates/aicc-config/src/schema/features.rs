//! Feature toggles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Boolean switches from the settings screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeaturesConfig {
    pub enable_streaming: bool,
    pub show_token_costs: bool,
    pub debug_mode: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            enable_streaming: false,
            show_token_costs: true,
            debug_mode: false,
        }
    }
}

/// Addressable name for a single toggle in [`FeaturesConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Streaming,
    TokenCosts,
    Debug,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Streaming, Feature::TokenCosts, Feature::Debug];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Streaming => "streaming",
            Feature::TokenCosts => "token-costs",
            Feature::Debug => "debug",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "streaming" | "enable-streaming" => Ok(Feature::Streaming),
            "token-costs" | "show-token-costs" => Ok(Feature::TokenCosts),
            "debug" | "debug-mode" => Ok(Feature::Debug),
            other => Err(format!(
                "unknown feature '{other}' (expected one of: streaming, token-costs, debug)"
            )),
        }
    }
}

impl FeaturesConfig {
    pub fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Streaming => self.enable_streaming,
            Feature::TokenCosts => self.show_token_costs,
            Feature::Debug => self.debug_mode,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::Streaming => self.enable_streaming = enabled,
            Feature::TokenCosts => self.show_token_costs = enabled,
            Feature::Debug => self.debug_mode = enabled,
        }
    }
}
