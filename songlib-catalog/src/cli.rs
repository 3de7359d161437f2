//! Command-line arguments
//!
//! Every flag also reads an environment variable; clap gives the flag
//! priority over the variable.

use std::path::PathBuf;

use clap::Parser;
use songlib_common::config::ConfigOverrides;

/// Command-line arguments for songlib-catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "songlib-catalog")]
#[command(about = "Song catalog service with metadata lookup and verse pagination")]
#[command(version)]
pub struct Args {
    /// TOML config file
    #[arg(short, long, env = "SONGLIB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "SONGLIB_DATABASE")]
    pub database: Option<PathBuf>,

    /// Base URL of the song details lookup service
    #[arg(long, env = "EXTERNAL_API_URL")]
    pub lookup_url: Option<String>,

    /// Lookup request timeout in seconds
    #[arg(long, env = "EXTERNAL_API_TIMEOUT_SECS")]
    pub lookup_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Settings supplied on the command line or through the environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_address: self.bind_address.clone(),
            database_path: self.database.clone(),
            lookup_base_url: self.lookup_url.clone(),
            lookup_timeout_secs: self.lookup_timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}
