//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are collected by the binary (clap reads both) and handed to
//! [`ServiceConfig::resolve`] as [`ConfigOverrides`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default timeout for the metadata lookup call
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Default number of database connection attempts at startup
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 10;

/// Default delay between database connection attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5000;

const APP_DIR: &str = "songlib";

/// Configuration file contents
///
/// Every field is optional; anything missing falls through to the
/// compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// HTTP server port
    pub port: Option<u16>,

    /// HTTP bind address
    pub bind_address: Option<String>,

    /// Path to the SQLite database file
    pub database_path: Option<PathBuf>,

    /// Metadata lookup collaborator
    pub lookup: LookupConfig,

    /// Database connection behavior
    pub database: DatabaseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// `[lookup]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the lookup service (`<base>/info` is queried)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[database]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection attempts before giving up
    pub connect_attempts: Option<u32>,

    /// Delay between connection attempts in milliseconds
    pub retry_delay_ms: Option<u64>,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    pub lookup_base_url: Option<String>,
    pub lookup_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind_address: String,
    pub database_path: PathBuf,
    /// `None` means enrichment always uses the fallback data
    pub lookup_base_url: Option<String>,
    pub lookup_timeout: Duration,
    pub connect_attempts: u32,
    pub retry_delay: Duration,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides, file contents and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let lookup_base_url = overrides
            .lookup_base_url
            .or(file.lookup.base_url)
            .and_then(|url| normalize_base_url(&url));

        // A zero timeout would fail every lookup
        let lookup_timeout_secs = overrides
            .lookup_timeout_secs
            .or(file.lookup.timeout_secs)
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS)
            .max(1);

        let connect_attempts = file
            .database
            .connect_attempts
            .unwrap_or(DEFAULT_CONNECT_ATTEMPTS)
            .max(1);

        Self {
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or_else(default_database_path),
            lookup_base_url,
            lookup_timeout: Duration::from_secs(lookup_timeout_secs),
            connect_attempts,
            retry_delay: Duration::from_millis(
                file.database
                    .retry_delay_ms
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Trim whitespace and trailing slashes; an empty URL counts as unset
fn normalize_base_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Load the TOML configuration file
///
/// An explicit path must exist. Without one, the platform config file is
/// used when present; a missing file is not an error and yields defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                info!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = toml::from_str::<TomlConfig>(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Platform config file path (`~/.config/songlib/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(APP_DIR).join("songs.db"),
        None => {
            warn!("Could not determine data directory, using working directory");
            PathBuf::from("./songlib_data/songs.db")
        }
    }
}
