//! Configuration loading
//!
//! Each setting is resolved independently in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_LEGACY_TABLE: &str = "InventoryItems";

pub const ENV_DATABASE: &str = "INVTRACK_DATABASE";
pub const ENV_LEGACY_TABLE: &str = "INVTRACK_LEGACY_TABLE";
pub const ENV_BIND: &str = "INVTRACK_BIND";
pub const ENV_PORT: &str = "INVTRACK_PORT";
pub const ENV_MIGRATE_LEGACY: &str = "INVTRACK_MIGRATE_LEGACY";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub legacy_table: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub migrate_legacy: Option<bool>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub legacy_table: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub migrate_legacy: Option<bool>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    pub database_path: PathBuf,
    /// Table holding pre-normalization rows, read once at first startup
    pub legacy_table: String,
    pub bind_address: String,
    pub port: u16,
    pub migrate_legacy: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            legacy_table: DEFAULT_LEGACY_TABLE.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            migrate_legacy: true,
        }
    }
}

impl InventoryConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let toml = match &overrides.config_file {
            Some(path) => load_toml_config(path)?,
            None => match default_config_file() {
                Some(path) => load_toml_config(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::merge(overrides, &toml)
    }

    /// Merge sources without touching the filesystem
    pub fn merge(overrides: &ConfigOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let database_path = overrides
            .database_path
            .clone()
            .or_else(|| env_var(ENV_DATABASE).map(PathBuf::from))
            .or_else(|| toml.database_path.clone())
            .unwrap_or(defaults.database_path);

        let legacy_table = overrides
            .legacy_table
            .clone()
            .or_else(|| env_var(ENV_LEGACY_TABLE))
            .or_else(|| toml.legacy_table.clone())
            .unwrap_or(defaults.legacy_table);

        let bind_address = overrides
            .bind_address
            .clone()
            .or_else(|| env_var(ENV_BIND))
            .or_else(|| toml.bind_address.clone())
            .unwrap_or(defaults.bind_address);

        let port = match overrides.port {
            Some(port) => port,
            None => match env_var(ENV_PORT) {
                Some(raw) => raw
                    .parse::<u16>()
                    .map_err(|e| Error::Config(format!("{}={:?}: {}", ENV_PORT, raw, e)))?,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let migrate_legacy = match overrides.migrate_legacy {
            Some(flag) => flag,
            None => match env_var(ENV_MIGRATE_LEGACY) {
                Some(raw) => parse_bool(&raw).ok_or_else(|| {
                    Error::Config(format!("{}={:?}: expected true/false", ENV_MIGRATE_LEGACY, raw))
                })?,
                None => toml.migrate_legacy.unwrap_or(defaults.migrate_legacy),
            },
        };

        Ok(Self {
            database_path,
            legacy_table,
            bind_address,
            port,
            migrate_legacy,
        })
    }

    /// `host:port` string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;

    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Invalid {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// First existing config file among the platform locations
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("invtrack").join("config.toml"));
    let system_config = PathBuf::from("/etc/invtrack/config.toml");

    user_config
        .into_iter()
        .chain(cfg!(unix).then_some(system_config))
        .find(|path| path.exists())
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("invtrack"))
        .unwrap_or_else(|| PathBuf::from("./invtrack_data"))
        .join("invtrack.db")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
