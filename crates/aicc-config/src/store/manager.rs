//! [`SettingsStore`]: owner of the current settings snapshot.
//!
//! Consumers never mutate settings in place. They read an
//! `Arc<CommandCenterConfig>` snapshot, and every update builds a new
//! config, validates it, persists it and then publishes the replacement
//! on a [`tokio::sync::watch`] channel.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aicc_common::ConfigError;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::schema::{CommandCenterConfig, Feature};
use crate::toml_loader;
use crate::toml_writer::save_config_to_path;
use crate::validation;

pub struct SettingsStore {
    /// Backing file. `None` keeps the store in memory only.
    path: Option<PathBuf>,
    tx: watch::Sender<Arc<CommandCenterConfig>>,
    /// Serializes read-modify-publish so concurrent edits are not lost.
    writer: Mutex<()>,
}

impl SettingsStore {
    /// In-memory store seeded with `config`.
    pub fn new(config: CommandCenterConfig) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(config));
        Self {
            path: None,
            tx,
            writer: Mutex::new(()),
        }
    }

    /// Store seeded with `config` that persists every update to `path`.
    pub fn with_path(config: CommandCenterConfig, path: impl Into<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(config));
        Self {
            path: Some(path.into()),
            tx,
            writer: Mutex::new(()),
        }
    }

    /// Load `path` (defaults if it does not exist yet) and persist updates there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match toml_loader::load_from_path(&path) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(_)) => {
                debug!(path = %path.display(), "no settings file yet, using defaults");
                CommandCenterConfig::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self::with_path(config, path))
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current settings. Cheap to call; the snapshot never changes under you.
    pub fn snapshot(&self) -> Arc<CommandCenterConfig> {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every published replacement.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CommandCenterConfig>> {
        self.tx.subscribe()
    }

    /// Apply `edit` to a copy of the current settings and publish it.
    ///
    /// Nothing is published or written if the edited config fails
    /// validation or cannot be saved.
    ///
    /// Updates are applied one at a time; `edit` must not call back into
    /// the store.
    pub fn update<F>(&self, edit: F) -> Result<Arc<CommandCenterConfig>, ConfigError>
    where
        F: FnOnce(&mut CommandCenterConfig),
    {
        let _writer = self.lock_writer();
        let mut next = (*self.snapshot()).clone();
        edit(&mut next);
        validation::validate(&next)?;

        if let Some(ref path) = self.path {
            save_config_to_path(&next, path)?;
        }

        let next = Arc::new(next);
        self.tx.send_replace(next.clone());
        debug!("settings updated");
        Ok(next)
    }

    pub fn set_feature(
        &self,
        feature: Feature,
        enabled: bool,
    ) -> Result<Arc<CommandCenterConfig>, ConfigError> {
        self.update(|config| config.features.set(feature, enabled))
    }

    /// Restore defaults and remove the backing file.
    pub fn reset(&self) -> Result<Arc<CommandCenterConfig>, ConfigError> {
        let _writer = self.lock_writer();
        if let Some(ref path) = self.path {
            match std::fs::remove_file(path) {
                Ok(()) => info!("removed settings file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ConfigError::WriteError(format!(
                        "failed to remove {}: {e}",
                        path.display()
                    )))
                }
            }
        }

        let defaults = Arc::new(CommandCenterConfig::default());
        self.tx.send_replace(defaults.clone());
        Ok(defaults)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(CommandCenterConfig::default())
    }
}
