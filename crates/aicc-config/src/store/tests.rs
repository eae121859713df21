//! Tests for the settings store.

use super::*;
use crate::schema::{CommandCenterConfig, Environment, Feature};
use aicc_common::ConfigError;
use std::sync::Arc;

#[test]
fn update_replaces_snapshot() {
    let store = SettingsStore::default();
    let before = store.snapshot();

    store
        .update(|c| c.environment = Environment::Prod)
        .unwrap();

    let after = store.snapshot();
    assert_eq!(before.environment, Environment::Dev);
    assert_eq!(after.environment, Environment::Prod);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn invalid_update_is_not_published() {
    let store = SettingsStore::default();
    let result = store.update(|c| c.api.base_url = "not a url".into());

    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    assert_eq!(store.snapshot().api.base_url, "http://localhost:8000/api/v1");
}

#[tokio::test]
async fn subscribers_see_updates() {
    let store = SettingsStore::default();
    let mut rx = store.subscribe();

    store.set_feature(Feature::Debug, true).unwrap();

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().features.debug_mode);
}

#[test]
fn updates_are_persisted_when_backed_by_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let store = SettingsStore::open(&path).unwrap();
    assert_eq!(*store.snapshot(), CommandCenterConfig::default());
    assert!(!path.exists());

    store
        .update(|c| c.model.model = "claude-3-haiku".into())
        .unwrap();
    assert!(path.exists());

    let reopened = SettingsStore::open(&path).unwrap();
    assert_eq!(reopened.snapshot().model.model, "claude-3-haiku");
}

#[test]
fn reset_restores_defaults_and_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let store = SettingsStore::open(&path).unwrap();

    store.set_feature(Feature::TokenCosts, false).unwrap();
    assert!(path.exists());

    let defaults = store.reset().unwrap();
    assert!(defaults.features.show_token_costs);
    assert!(!path.exists());
    assert_eq!(*store.snapshot(), CommandCenterConfig::default());
}

#[test]
fn reset_without_file_is_ok() {
    let store = SettingsStore::default();
    store.set_feature(Feature::Streaming, true).unwrap();
    store.reset().unwrap();
    assert!(!store.snapshot().features.enable_streaming);
    assert!(store.path().is_none());
}

#[test]
fn open_rejects_unparseable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nbase_url = ").unwrap();

    assert!(matches!(
        SettingsStore::open(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn concurrent_updates_are_not_lost() {
    let store = SettingsStore::default();
    let start = store.snapshot().model.max_tokens;

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    store.update(|c| c.model.max_tokens += 1).unwrap();
                }
            });
        }
    });

    assert_eq!(store.snapshot().model.max_tokens, start + 800);
}
