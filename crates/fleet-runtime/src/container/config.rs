//! # Runtime Configuration
//!
//! Unified configuration for the gateway, the lifecycle services and the
//! storage backend.
//!
//! ## Loading order
//!
//! 1. Built-in defaults
//! 2. TOML file named by `FLEET_CONFIG` (if set)
//! 3. Environment overrides
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `FLEET_HTTP_HOST` | `gateway.http.host` |
//! | `FLEET_HTTP_PORT` | `gateway.http.port` |
//! | `FLEET_JWT_SECRET` | `gateway.auth.secret` |
//! | `FLEET_CORS_ORIGINS` | `gateway.cors.allowed_origins` (comma separated) |
//! | `FLEET_STRICT_TRANSITIONS` | `lifecycle.strict_transitions` |
//! | `FLEET_STORAGE_BACKEND` | `storage.backend` (`memory` or `rocksdb`) |
//! | `FLEET_DATA_DIR` | `storage.data_dir` |
//! | `FLEET_PRODUCTION` | `production` |
//!
//! ## Security Requirements
//!
//! - With `production` set, the JWT secret MUST NOT be the development
//!   default and must be at least 32 bytes long.

use fm_02_shipment_lifecycle::ShipmentLifecycleConfig;
use fm_05_api_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Complete fleetd configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// REST gateway.
    pub gateway: GatewayConfig,
    /// Shipment lifecycle rules.
    pub lifecycle: ShipmentLifecycleConfig,
    /// Storage backend.
    pub storage: StorageConfig,
    /// Apply the production checks at startup.
    pub production: bool,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; contents are lost on restart.
    #[default]
    Memory,
    /// RocksDB under `data_dir` (requires the `rocksdb` feature).
    Rocksdb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::Rocksdb),
            other => Err(ConfigError::InvalidEnv {
                var: "FLEET_STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for persistent backends.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error(transparent)]
    Gateway(#[from] fm_05_api_gateway::ConfigError),
}

impl FleetConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load with `lookup` standing in for the environment.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("FLEET_CONFIG") {
            Some(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("FLEET_HTTP_HOST") {
            self.gateway.http.host = parse_env("FLEET_HTTP_HOST", &host)?;
        }
        if let Some(port) = lookup("FLEET_HTTP_PORT") {
            self.gateway.http.port = parse_env("FLEET_HTTP_PORT", &port)?;
        }
        if let Some(secret) = lookup("FLEET_JWT_SECRET") {
            self.gateway.auth.secret = secret;
        }
        if let Some(origins) = lookup("FLEET_CORS_ORIGINS") {
            self.gateway.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(strict) = lookup("FLEET_STRICT_TRANSITIONS") {
            self.lifecycle.strict_transitions = parse_flag("FLEET_STRICT_TRANSITIONS", &strict)?;
        }
        if let Some(backend) = lookup("FLEET_STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(dir) = lookup("FLEET_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(production) = lookup("FLEET_PRODUCTION") {
            self.production = parse_flag("FLEET_PRODUCTION", &production)?;
        }
        Ok(())
    }

    /// Validate configuration, adding the production checks when
    /// `production` is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.production {
            self.gateway.validate_for_production()?;
        } else {
            self.gateway.validate()?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}
