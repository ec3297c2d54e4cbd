//! Cluster configuration.
//!
//! One TOML file describes the whole cluster: a `[room]`,
//! `[activity]`, and `[reservation]` table with host/port each, plus
//! `[storage]` with the data directory. Resolution order: explicit
//! path, `ATRIUM_CONFIG` env var, `./atrium.toml`, built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the config file path.
pub const CONFIG_ENV: &str = "ATRIUM_CONFIG";

/// Default config filename looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "atrium.toml";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_room() -> ServiceConfig {
    ServiceConfig {
        host: default_host(),
        port: 8081,
    }
}

fn default_activity() -> ServiceConfig {
    ServiceConfig {
        host: default_host(),
        port: 8082,
    }
}

fn default_reservation() -> ServiceConfig {
    ServiceConfig {
        host: default_host(),
        port: 8083,
    }
}

/// Bind address of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind and to be reached on by peers.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServiceConfig {
    /// `host:port` form accepted by connect and bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Persistence settings shared by all services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the per-service store documents.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Configuration for the whole three-service cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Room inventory service.
    #[serde(default = "default_room")]
    pub room: ServiceConfig,
    /// Activity catalog service.
    #[serde(default = "default_activity")]
    pub activity: ServiceConfig,
    /// Reservation orchestration service.
    #[serde(default = "default_reservation")]
    pub reservation: ServiceConfig,
    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            room: default_room(),
            activity: default_activity(),
            reservation: default_reservation(),
            storage: StorageConfig::default(),
        }
    }
}

impl ClusterConfig {
    /// Parse a config from TOML text. Missing tables fall back to the
    /// defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize the config to TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config from a specific file path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load the cluster config.
    ///
    /// Tries, in order: the explicit `path`, the `ATRIUM_CONFIG` env
    /// var, `./atrium.toml`, and finally the built-in defaults. A file
    /// named by the first two must exist and parse; the local file is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        if let Ok(env_path) = std::env::var(CONFIG_ENV)
            && !env_path.is_empty()
        {
            return Self::from_path(Path::new(&env_path));
        }
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::from_path(local);
        }
        Ok(Self::default())
    }
}
