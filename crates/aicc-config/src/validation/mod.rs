//! Configuration validation.
//!
//! Each check pushes a message instead of returning early so the user
//! sees every problem in one pass.

mod helpers;


use aicc_common::ConfigError;

use crate::schema::CommandCenterConfig;

use helpers::{validate_range, validate_range_f64};

/// Largest `max_tokens` the settings screen accepts.
pub const MAX_TOKENS_LIMIT: u32 = 200_000;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CommandCenterConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_api(&mut errors, config);
    validate_model(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_api(errors: &mut Vec<String>, config: &CommandCenterConfig) {
    let url = config.api.base_url.trim();
    if url.is_empty() {
        errors.push("api.base_url must not be empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "api.base_url = {url} must start with http:// or https://"
        ));
    }

    if config.api.timeout_secs == Some(0) {
        errors.push("api.timeout_secs must be greater than 0 when set".into());
    }
}

fn validate_model(errors: &mut Vec<String>, config: &CommandCenterConfig) {
    if config.model.model.trim().is_empty() {
        errors.push("model.model must not be empty".into());
    }
    validate_range_f64(
        errors,
        "model.temperature",
        config.model.temperature,
        0.0,
        2.0,
    );
    validate_range(
        errors,
        "model.max_tokens",
        config.model.max_tokens,
        1,
        MAX_TOKENS_LIMIT,
    );
}
