//! Tests for TOML config loading and graceful degradation
//!
//! - Missing config file does not stop startup
//! - Partial files fall through to compiled defaults
//! - Malformed files are reported with their path

use qradio_common::config::{load_toml_config, ConfigOverrides, ServerConfig};
use qradio_common::Error;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_none() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let loaded = load_toml_config(&path).unwrap();
    assert!(loaded.is_none());

    // Startup continues with defaults
    let config = ServerConfig::resolve(ConfigOverrides::default(), loaded).unwrap();
    assert_eq!(config.port, 3000);
}

#[test]
fn test_full_file_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
port = 8000
fallback_port = 8001
bind_address = "127.0.0.1"
upstream_base_url = "http://localhost:9999/api/"
request_timeout_secs = 5

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let toml = load_toml_config(&path).unwrap().expect("file exists");
    let config = ServerConfig::resolve(ConfigOverrides::default(), Some(toml)).unwrap();

    assert_eq!(config.port, 8000);
    assert_eq!(config.fallback_port, Some(8001));
    assert_eq!(config.bind_address.to_string(), "127.0.0.1");
    assert_eq!(config.upstream_base_url, "http://localhost:9999/api");
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_partial_file_uses_defaults_for_the_rest() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = 4100\n").unwrap();

    let toml = load_toml_config(&path).unwrap();
    let config = ServerConfig::resolve(ConfigOverrides::default(), toml).unwrap();

    assert_eq!(config.port, 4100);
    assert_eq!(config.fallback_port, Some(3001));
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_overrides_beat_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = 4100\nbind_address = \"127.0.0.1\"\n").unwrap();

    let toml = load_toml_config(&path).unwrap();
    let overrides = ConfigOverrides {
        port: Some(5000),
        bind_address: Some("::1".to_string()),
        ..Default::default()
    };
    let config = ServerConfig::resolve(overrides, toml).unwrap();

    assert_eq!(config.port, 5000);
    assert_eq!(config.bind_address.to_string(), "::1");
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "port = \"not a number\"\n").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    match err {
        Error::Config(msg) => assert!(msg.contains("broken.toml"), "message: {}", msg),
        other => panic!("expected Config error, got {:?}", other),
    }
}
