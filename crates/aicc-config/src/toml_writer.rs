//! Persisting settings as TOML.
//!
//! The serialized settings land in a `config.toml.tmp` sibling and are then
//! renamed over the real file, so readers see either the old or the new
//! settings and never a partial file.

use std::path::Path;

use aicc_common::ConfigError;
use tracing::{debug, warn};

use crate::schema::CommandCenterConfig;
use crate::toml_loader::default_config_path;

/// First line of every file this module writes.
pub(crate) const FILE_HEADER: &str = "# AI Command Center settings (managed by aicc)\n\n";

pub fn save_config(config: &CommandCenterConfig) -> Result<(), ConfigError> {
    save_config_to_path(config, &default_config_path()?)
}

/// Serialize `config` and replace `path` with it. Missing parent
/// directories are created.
pub fn save_config_to_path(config: &CommandCenterConfig, path: &Path) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::WriteError(format!("cannot encode settings: {e}")))?;
    let contents = format!("{FILE_HEADER}{body}");

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| write_error("create", dir, e))?;
    }
    replace_file(path, &contents)?;

    debug!(path = %path.display(), bytes = contents.len(), "settings written");
    Ok(())
}

fn replace_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let staging = path.with_extension("toml.tmp");
    std::fs::write(&staging, contents).map_err(|e| write_error("write", &staging, e))?;

    match std::fs::rename(&staging, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // Windows refuses to rename over an existing file.
            warn!(path = %path.display(), "rename failed ({rename_err}); overwriting in place");
            let result = std::fs::write(path, contents).map_err(|e| write_error("write", path, e));
            let _ = std::fs::remove_file(&staging);
            result
        }
    }
}

fn write_error(action: &str, path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::WriteError(format!("cannot {action} {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Environment, LogLevel};
    use tempfile::TempDir;

    #[test]
    fn save_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CommandCenterConfig::default();
        config.environment = Environment::Prod;
        config.api.timeout_secs = Some(45);
        config.model.api_key = "sk-test".into();
        config.features.debug_mode = true;
        config.logging.level = LogLevel::Warn;
        save_config_to_path(&config, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: CommandCenterConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn save_config_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");

        save_config_to_path(&CommandCenterConfig::default(), &path).unwrap();

        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("localhost:8000"));
    }

    #[test]
    fn save_config_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to_path(&CommandCenterConfig::default(), &path).unwrap();
        save_config_to_path(&CommandCenterConfig::default(), &path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn saved_file_starts_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to_path(&CommandCenterConfig::default(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(FILE_HEADER));
    }

    #[test]
    fn unwritable_parent_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = save_config_to_path(&CommandCenterConfig::default(), &blocker.join("config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::WriteError(_)));
    }
}
