use chorus::config::{Config, ConfigError};
use chorus::plugins::registry;
use serde_json::json;
use std::fs;
use tempfile::NamedTempFile;

fn write_toml(toml: &str) -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(&temp_file, toml).unwrap();
    temp_file
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/chorus.toml");
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn test_malformed_config_file() {
    let temp_file = write_toml("[host\nid = 1");
    assert!(matches!(
        Config::from_file(temp_file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_missing_host_section() {
    let temp_file = write_toml("[logging]\nlog_to_file = false\n");
    assert!(matches!(
        Config::from_file(temp_file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_preset_mappings_must_exist() {
    let toml = r#"
        [host]
        id = "h"

        [plugins.reshape]
        plugin_type = "json-processor"
        [plugins.reshape.options]
        mappings_path = "/nonexistent/mappings.json"
    "#;
    let temp_file = write_toml(toml);
    assert!(matches!(
        Config::from_file(temp_file.path()),
        Err(ConfigError::InvalidPlugin { .. })
    ));
}

// The registry is process-wide, so everything touching it lives in one test
#[tokio::test]
async fn test_configured_plugin_runs_through_registry() {
    let mappings = NamedTempFile::new().unwrap();
    fs::write(&mappings, r#"{"order.id": "id", "order.customer.name": "customer"}"#).unwrap();

    let toml = format!(
        r#"
        [host]
        id = "registry-test"
        log_level = "debug"

        [plugins.orders]
        plugin_type = "json-processor"
        [plugins.orders.options]
        mappings_path = "{}"
        "#,
        mappings.path().to_string_lossy()
    );
    let config_file = write_toml(&toml);
    let config = Config::from_file(config_file.path()).unwrap();

    registry::initialise_plugin_registry(&config).unwrap();
    assert!(registry::initialise_plugin_registry(&config).is_err());

    let params = match json!({"data": {"order": {"id": 9, "customer": {"name": "Ann"}}}}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let out = chorus::run_action("orders", "transform", &params).await.unwrap();
    assert_eq!(out["result"], json!({"id": 9, "customer": "Ann"}));

    // rules were loaded at initialisation; later edits and deletion have no effect
    fs::write(&mappings, r#"{"order.id": "changed"}"#).unwrap();
    let out = chorus::run_action("orders", "transform", &params).await.unwrap();
    assert_eq!(out["result"], json!({"id": 9, "customer": "Ann"}));

    let mappings_path = mappings.path().to_path_buf();
    mappings.close().unwrap();
    assert!(!mappings_path.exists());
    let out = chorus::run_action("orders", "transform", &params).await.unwrap();
    assert_eq!(out["result"], json!({"id": 9, "customer": "Ann"}));

    // the same instance is handed out on every lookup
    let first = registry::resolve_plugin("orders").unwrap();
    let second = registry::resolve_plugin("orders").unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    // built-in names still resolve alongside configured ids
    assert!(registry::resolve_plugin("json-processor").is_ok());
    assert!(registry::resolve_plugin("unknown").is_err());
}
