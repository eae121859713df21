//! Command center client configuration.
//!
//! TOML-backed settings with validation and a [`SettingsStore`] that
//! publishes replacement snapshots to subscribers. All sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aicc_config::{load_config, SettingsStore};
//!
//! let config = load_config().expect("failed to load config");
//! let store = SettingsStore::new(config);
//! println!("{}", store.snapshot().api.base_url);
//! ```

pub mod schema;
pub mod store;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{
    ApiConfig, CommandCenterConfig, Environment, Feature, FeaturesConfig, LogLevel, ModelConfig,
    CONFIG_SCHEMA_VERSION, DEFAULT_API_URL,
};
pub use store::SettingsStore;
pub use toml_loader::default_config_path;
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;

use aicc_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file on first run.
pub fn load_config() -> Result<CommandCenterConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<CommandCenterConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to pretty JSON with the API key masked.
pub fn config_to_json(config: &CommandCenterConfig) -> String {
    let mut value = match serde_json::to_value(config) {
        Ok(value) => value,
        Err(e) => return format!("{{\"error\": \"failed to serialize config: {e}\"}}"),
    };
    if config.model.has_api_key() {
        value["model"]["api_key"] = serde_json::json!("********");
    }
    serde_json::to_string_pretty(&value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&CommandCenterConfig::default());
        assert!(json.contains("\"environment\": \"dev\""));
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"model\""));
        assert!(json.contains("\"features\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_masks_api_key() {
        let mut config = CommandCenterConfig::default();
        config.model.api_key = "sk-live-123".into();
        let json = config_to_json(&config);
        assert!(!json.contains("sk-live-123"));
        assert!(json.contains("********"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nmax_tokens = 0\n").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
