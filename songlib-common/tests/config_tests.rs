//! Tests for configuration file loading and priority resolution
//!
//! Priority: overrides (CLI/ENV) > TOML file > compiled defaults.
//! A missing default config file must never prevent startup.

use songlib_common::config::{
    load_toml_config, ConfigOverrides, ServiceConfig, TomlConfig, DEFAULT_PORT,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
port = 9090
bind_address = "127.0.0.1"
database_path = "/var/lib/songlib/catalog.db"

[lookup]
base_url = "http://lookup.local:8081/"
timeout_secs = 3

[database]
connect_attempts = 2
retry_delay_ms = 100

[logging]
level = "debug"
"#,
    );

    let file = load_toml_config(Some(&path)).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), file);

    assert_eq!(config.port, 9090);
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.database_path, PathBuf::from("/var/lib/songlib/catalog.db"));
    assert_eq!(config.lookup_base_url.as_deref(), Some("http://lookup.local:8081"));
    assert_eq!(config.lookup_timeout, Duration::from_secs(3));
    assert_eq!(config.connect_attempts, 2);
    assert_eq!(config.retry_delay, Duration::from_millis(100));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_partial_config_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[lookup]\ntimeout_secs = 1\n");

    let file = load_toml_config(Some(&path)).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), file);

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.lookup_base_url, None);
    assert_eq!(config.lookup_timeout, Duration::from_secs(1));
}

#[test]
fn test_overrides_take_priority_over_file() {
    let file = TomlConfig {
        port: Some(9090),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        port: Some(7000),
        lookup_base_url: Some("http://override:1".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, file);

    assert_eq!(config.port, 7000);
    assert_eq!(config.lookup_base_url.as_deref(), Some("http://override:1"));
}

#[test]
fn test_empty_lookup_url_means_unconfigured() {
    let overrides = ConfigOverrides {
        lookup_base_url: Some(String::new()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, TomlConfig::default());

    assert_eq!(config.lookup_base_url, None);
}

#[test]
fn test_explicit_missing_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(load_toml_config(Some(&missing)).is_err());
}

#[test]
fn test_malformed_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = \"not a number\"\n");

    let err = load_toml_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}
