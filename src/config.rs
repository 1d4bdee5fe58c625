//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, then applies
//! environment overrides (`PORT`, `DB_HOST`, ...). Every field has a default so
//! the service starts with no configuration at all. `AppConfig` is the root
//! configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

// =============================================================================
// Service Identity
// =============================================================================

/// Service name reported by the liveness probe
pub const SERVICE_NAME: &str = "docker-api-aws";

/// Service version reported by the liveness probe
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Implementation tag reported by the liveness probe
pub const APP_NAME: &str = "rust";

/// Welcome text served at `/`
pub const WELCOME_MESSAGE: &str = "Bienvenido a Docker API AWS";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Root page - static content
pub const HTTP_CACHE_ROOT_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_ROOT: &str = formatcp!("public, max-age={}", HTTP_CACHE_ROOT_MAX_AGE);

/// Health endpoints must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Database Pool Defaults
// =============================================================================

/// Maximum simultaneous pooled connections
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// Connection establishment / acquisition timeout in seconds
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 2;

/// Idle connection eviction timeout in seconds
pub const DB_IDLE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Server Lifecycle
// =============================================================================

/// How long in-flight requests may drain after a shutdown signal
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

// =============================================================================
// Default Strings
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "docker_api_aws=debug,tower_http=debug";

// =============================================================================
// Environment Keys
// =============================================================================

pub const ENV_HTTP_PORT: &str = "PORT";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// PostgreSQL connection and pool settings
    pub database: DatabaseConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Database connection settings.
///
/// `host`, `port` and `name` are echoed verbatim into health reports.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Pool size (default: 5)
    pub max_connections: u32,
    /// Acquisition and connect timeout in seconds (default: 2)
    pub connect_timeout_seconds: u64,
    /// Idle eviction timeout in seconds (default: 30)
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            max_connections: DB_MAX_CONNECTIONS,
            connect_timeout_seconds: DB_CONNECT_TIMEOUT_SECS,
            idle_timeout_seconds: DB_IDLE_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file. Missing sections and keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply environment overrides using `lookup` to resolve each key.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_HTTP_PORT) {
            self.http.port = parse_port(ENV_HTTP_PORT, &port)?;
        }
        if let Some(host) = lookup(ENV_DB_HOST) {
            self.database.host = host;
        }
        if let Some(port) = lookup(ENV_DB_PORT) {
            self.database.port = parse_port(ENV_DB_PORT, &port)?;
        }
        if let Some(name) = lookup(ENV_DB_NAME) {
            self.database.name = name;
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            self.database.user = user;
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            self.database.password = password;
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            ConfigError::Validation(format!("{} must be a port number, got {:?}", key, value))
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "postgres");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.password, "postgres");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.connect_timeout_seconds, 2);
        assert_eq!(config.database.idle_timeout_seconds, 30);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "8080"),
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "6543"),
                ("DB_NAME", "app"),
                ("DB_USER", "svc"),
                ("DB_PASSWORD", "hunter2"),
            ]))
            .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.name, "app");
        assert_eq!(config.database.user, "svc");
        assert_eq!(config.database.password, "hunter2");
    }

    #[test]
    fn test_env_invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[("DB_PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("DB_PORT")));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
port = 4000

[database]
host = "pg.example.com"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 4000);
        assert_eq!(config.database.host, "pg.example.com");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("/nonexistent/docker-api-aws.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = \"three thousand\"").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig {
            password: "s3cret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
