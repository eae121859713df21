//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# AI Command Center client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

# dev | prod
environment = "dev"

[api]
base_url = "http://localhost:8000/api/v1"
# timeout_secs = 60     # unset = HTTP client default

[model]
# api_key = ""
# model = "claude-3-5-sonnet-20241022"
# temperature = 0.7     # 0.0-2.0
# max_tokens = 1024     # 1-200000

[features]
# enable_streaming = false
# show_token_costs = true
# debug_mode = false

[logging]
# level = "info"        # trace | debug | info | warn | error
"##
    .to_string()
}
