//! # API Server Configuration
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     GEOPRICE_BIND_ADDR, GEOPRICE_PORT, GEOPRICE_DATABASE_PATH,         │
//! │     GEOPRICE_MAX_CONNECTIONS, GEOPRICE_CORS_ORIGIN                     │
//! │                                                                         │
//! │  2. Config File                                                        │
//! │     $GEOPRICE_CONFIG, else ./geoprice.toml                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5000, ./geoprice.db, any CORS origin                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! # geoprice.toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 5000
//! cors_origin = "https://admin.example.com"
//!
//! [database]
//! path = "/var/lib/geoprice/geoprice.db"
//! max_connections = 5
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use geoprice_db::DbConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GEOPRICE_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "geoprice.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Interface to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP port. The storefront script defaults to 5000.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin. `None` allows any origin, which the storefront
    /// script needs when it runs on third-party shop domains.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            bind_addr: default_bind_addr(),
            port: default_port(),
            cors_origin: None,
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// SQLite file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./geoprice.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (geoprice.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// `$GEOPRICE_CONFIG`, else `./geoprice.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "bind_addr must be an IP address, got: {}",
                self.server.bind_addr
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".into()));
        }

        Ok(())
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("bad bind_addr: {}", self.server.bind_addr)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Database settings for `geoprice_db::Database::new`.
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(&self.database.path).max_connections(self.database.max_connections);
        if config.is_in_memory() {
            return DbConfig::in_memory();
        }
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("GEOPRICE_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("GEOPRICE_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(value = %port, "Ignoring invalid GEOPRICE_PORT"),
            }
        }

        if let Ok(path) = std::env::var("GEOPRICE_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("GEOPRICE_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(m) => self.database.max_connections = m,
                Err(_) => warn!(value = %max, "Ignoring invalid GEOPRICE_MAX_CONNECTIONS"),
            }
        }

        if let Ok(origin) = std::env::var("GEOPRICE_CORS_ORIGIN") {
            self.server.cors_origin = if origin.is_empty() || origin == "*" {
                None
            } else {
                Some(origin)
            };
        }
    }
}
