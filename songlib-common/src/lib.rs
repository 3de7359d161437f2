//! # songlib Common Library
//!
//! Shared code for the song catalog service:
//! - Song record models and store filters
//! - Database bootstrap (connection retry, migrations)
//! - Layered configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
