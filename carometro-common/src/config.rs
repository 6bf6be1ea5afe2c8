//! Configuration loading and resolution
//!
//! Each setting is resolved independently, first match wins:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CAROMETRO_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file is not an error: it logs a warning and
//! the remaining tiers still apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

pub const ENV_HOST: &str = "CAROMETRO_HOST";
pub const ENV_PORT: &str = "CAROMETRO_PORT";
pub const ENV_PHOTOS_DIR: &str = "CAROMETRO_PHOTOS_DIR";
pub const ENV_MAX_UPLOAD_BYTES: &str = "CAROMETRO_MAX_UPLOAD_BYTES";
pub const ENV_CONFIG: &str = "CAROMETRO_CONFIG";
pub const ENV_LOG_LEVEL: &str = "CAROMETRO_LOG_LEVEL";

/// Built-in defaults used when no other tier provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub photos_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5780,
            photos_dir: PathBuf::from("public").join("photos"),
            // A 1280x720 JPEG data URL does not fit axum's 2 MiB default
            max_upload_bytes: 10 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub photos_dir: Option<PathBuf>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub photos_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    pub config: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub photos_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve every setting from CLI, environment, TOML and defaults
    ///
    /// Reads the TOML file named by `--config`, then `CAROMETRO_CONFIG`,
    /// then the platform default location.
    pub fn resolve(cli: &CliOverrides) -> Self {
        let config_path = cli
            .config
            .clone()
            .or_else(|| env_value(ENV_CONFIG))
            .or_else(default_config_path);

        let toml_config = match config_path {
            Some(path) => load_toml_config_or_default(&path),
            None => {
                warn!("Could not determine config directory, using defaults");
                TomlConfig::default()
            }
        };

        Self::resolve_with(cli, &toml_config, &CompiledDefaults::default())
    }

    /// Resolution without touching the filesystem
    pub fn resolve_with(
        cli: &CliOverrides,
        toml_config: &TomlConfig,
        defaults: &CompiledDefaults,
    ) -> Self {
        Self {
            host: cli
                .host
                .clone()
                .or_else(|| env_value(ENV_HOST))
                .or_else(|| toml_config.host.clone())
                .unwrap_or_else(|| defaults.host.clone()),
            port: cli
                .port
                .or_else(|| env_value(ENV_PORT))
                .or(toml_config.port)
                .unwrap_or(defaults.port),
            photos_dir: cli
                .photos_dir
                .clone()
                .or_else(|| env_value(ENV_PHOTOS_DIR))
                .or_else(|| toml_config.photos_dir.clone())
                .unwrap_or_else(|| defaults.photos_dir.clone()),
            max_upload_bytes: cli
                .max_upload_bytes
                .or_else(|| env_value(ENV_MAX_UPLOAD_BYTES))
                .or(toml_config.max_upload_bytes)
                .unwrap_or(defaults.max_upload_bytes),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env_value(ENV_LOG_LEVEL))
                .or_else(|| toml_config.logging.level.clone())
                .unwrap_or_else(|| defaults.log_level.clone()),
        }
    }

    /// `host:port` for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read an environment variable, ignoring (with a warning) unparsable values
fn env_value<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

/// Platform config location: `<config_dir>/carometro/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("carometro").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Parse a TOML config file, falling back to an empty config
pub fn load_toml_config_or_default(path: &Path) -> TomlConfig {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return TomlConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{} - using defaults", e);
            TomlConfig::default()
        }
    }
}
