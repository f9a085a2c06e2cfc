//! # configs
//!
//! Layered settings for the dai-site binary: built-in defaults, then an
//! optional `.env` file, then `DAI_*` environment variables.

use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "DAI";

#[derive(Error, Debug)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing persists past the process
    Memory,
    /// One JSON file per key under `root`
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    /// Default `env_logger` filter when RUST_LOG is unset
    pub log_level: String,
}

/// Loads `.env` (if present) and then reads the environment.
pub fn load() -> Result<Settings, ConfigsError> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("loaded environment from {}", path.display());
    }
    from_env(Environment::with_prefix(ENV_PREFIX))
}

/// Builds settings from an explicit environment source. `.env` is not read.
pub fn from_env(env: Environment) -> Result<Settings, ConfigsError> {
    let settings = Config::builder()
        .set_default("storage.backend", "file")?
        .set_default("storage.root", "./data/site")?
        .set_default("log_level", "info")?
        .add_source(env.prefix_separator("_").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
