//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `CATALOG_CONFIG`),
//! then environment variables override individual values:
//!
//! | Variable | Setting |
//! |---|---|
//! | `HOST` | `server.host` (IP address or host name) |
//! | `PORT` | `server.port` |
//! | `MONGO_URI` | `database.uri`, and selects the `mongodb` backend |
//! | `DATABASE_NAME` | `database.name` |
//! | `LOG_LEVEL` | `logging.level` |
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! database:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   name: catalog
//! pagination:
//!   default_limit: 10
//!   max_limit: 100
//! cors:
//!   allowed_origins: ["http://localhost:3000"]
//! logging:
//!   level: info
//!   format: compact
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable holding the path of the YAML configuration file
pub const CONFIG_PATH_VAR: &str = "CATALOG_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Which product store to run against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,

    /// Connection string, required by the `mongodb` backend
    pub uri: Option<String>,

    /// Database name
    pub name: String,

    pub server_selection_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            uri: None,
            name: "catalog".to_string(),
            server_selection_timeout_secs: 30,
            connect_timeout_secs: 30,
        }
    }
}

/// List endpoint paging limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size when the request does not name one
    pub default_limit: u64,

    /// Largest accepted page size; larger requests are clamped
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Cross-origin settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: display });
        }

        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(display),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the file named by `CATALOG_CONFIG` (defaults otherwise), apply
    /// environment overrides and validate the result
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.database.uri = Some(uri);
            self.database.backend = StorageBackend::Mongodb;
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database.name = name;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.server.host.trim().is_empty() {
            return invalid("server.host", "must not be empty");
        }
        if self.server.port == 0 {
            return invalid("server.port", "must be greater than 0");
        }
        if self.pagination.default_limit == 0 {
            return invalid("pagination.default_limit", "must be greater than 0");
        }
        if self.pagination.max_limit == 0 {
            return invalid("pagination.max_limit", "must be greater than 0");
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return invalid(
                "pagination.default_limit",
                "must not exceed pagination.max_limit",
            );
        }
        if self.database.backend == StorageBackend::Mongodb
            && self.database.uri.as_deref().is_none_or(|u| u.trim().is_empty())
        {
            return invalid("database.uri", "is required by the mongodb backend");
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    ///
    /// `server.host` may be an IP address or a host name; a name is resolved
    /// and its first address is used.
    pub async fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.trim();
        let invalid = |message: String| ConfigError::InvalidValue {
            key: "server.host".to_string(),
            message,
        };

        let mut addrs = tokio::net::lookup_host((host, self.server.port))
            .await
            .map_err(|e| invalid(format!("'{}' could not be resolved: {}", host, e)))?;
        addrs
            .next()
            .ok_or_else(|| invalid(format!("'{}' resolved to no address", host)))
    }
}
