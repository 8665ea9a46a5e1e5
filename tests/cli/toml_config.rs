//! Configuration file tests

use pubqueue::app::cli::api::{ConfigError, DemoConfig, DEFAULT_RECEIVE_TIMEOUT_MS};
use pubqueue::core::error_handling::ContextualError;
use std::fs;
use tempfile::TempDir;

fn config_in(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("pubqueue.toml");
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_full_configuration_file() {
    let dir = TempDir::new().unwrap();
    let path = config_in(
        &dir,
        r#"
log_level = "debug"
log_format = "json"
color = false
receive_timeout_ms = 500

[queue]
queue_id = "orders"
capacity = 16
event_capacity = 8

[[producers]]
name = "east"
messages = 4
interval_ms = 10
prefix = "e"

[[producers]]
name = "west"
messages = 2

[[subscribers]]
name = "audit"
receive = 6
"#,
    );

    let config = DemoConfig::load(Some(&path)).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.queue.queue_id, "orders");
    assert_eq!(config.queue.capacity, 16);
    assert_eq!(config.queue.event_capacity, 8);
    assert_eq!(config.receive_timeout_ms, 500);
    assert_eq!(config.producers.len(), 2);
    assert_eq!(config.producers[0].prefix, "e");
    assert_eq!(config.producers[1].prefix, "m");
    assert_eq!(config.subscribers.len(), 1);
    assert_eq!(config.subscribers[0].interval_ms, 0);
    assert!(!config.log_settings().color);
}

#[test]
fn test_empty_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "");

    let config = DemoConfig::load(Some(&path)).unwrap();
    assert_eq!(config, DemoConfig::default());
    assert_eq!(config.receive_timeout_ms, DEFAULT_RECEIVE_TIMEOUT_MS);
}

#[test]
fn test_malformed_toml_is_user_actionable() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "[queue\ncapacity = 2");

    let error = DemoConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Parse { .. }));
    assert!(error.is_user_actionable());
    assert!(error.to_string().contains("pubqueue.toml"));
}

#[test]
fn test_wrong_value_type_rejected() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "[queue]\ncapacity = \"two\"\n");

    assert!(matches!(
        DemoConfig::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_producer_without_messages_field_rejected() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "[[producers]]\nname = \"p\"\n");

    assert!(DemoConfig::load(Some(&path)).is_err());
}

#[test]
fn test_empty_worker_name_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "[[subscribers]]\nname = \" \"\nreceive = 1\n");

    let config = DemoConfig::load(Some(&path)).unwrap();
    match config.validate() {
        Err(ConfigError::Invalid { message }) => assert!(message.contains("names")),
        other => panic!("Expected Invalid, got {:?}", other),
    }
}
