//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `servicehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Property bus settings.
    pub pubsub: PubSubConfig,
    /// Caller privilege settings.
    pub auth: AuthConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PubSubConfig {
    /// Capacity of the property update channel.
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Roles allowed to see the link configuration of every device.
    pub privileged_roles: Vec<String>,
}

impl Config {
    /// Load configuration from `servicehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("servicehub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SERVICEHUB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("SERVICEHUB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        let bind = var("SERVICEHUB_BIND");
        if let Some((host, port)) = bind.as_deref().and_then(|val| val.rsplit_once(':')) {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SERVICEHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("SERVICEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("SERVICEHUB_PRIVILEGED_ROLES") {
            self.auth.privileged_roles = val
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(String::from)
                .collect();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.pubsub.capacity == 0 {
            return Err(ConfigError::Validation(
                "pubsub capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:servicehub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "servicehubd=info,servicehub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            privileged_roles: vec!["admin".to_string()],
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:servicehub.db?mode=rwc");
        assert_eq!(config.pubsub.capacity, 256);
        assert_eq!(config.auth.privileged_roles, ["admin"]);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [pubsub]
            capacity = 8

            [auth]
            privileged_roles = ['admin', 'operator']
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.pubsub.capacity, 8);
        assert_eq!(config.auth.privileged_roles, ["admin", "operator"]);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite:servicehub.db?mode=rwc");
        assert_eq!(config.auth.privileged_roles, ["admin"]);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_override_from_environment() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("SERVICEHUB_HOST", "10.0.0.1"),
            ("SERVICEHUB_PORT", "8081"),
            ("SERVICEHUB_DATABASE_URL", "sqlite::memory:"),
            ("SERVICEHUB_LOG", "trace"),
        ]));
        assert_eq!(config.bind_addr(), "10.0.0.1:8081");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_bind_over_host_and_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("SERVICEHUB_HOST", "10.0.0.1"),
            ("SERVICEHUB_PORT", "8081"),
            ("SERVICEHUB_BIND", "127.0.0.1:7000"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn should_ignore_unparseable_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("SERVICEHUB_PORT", "http")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_let_rust_log_win_over_servicehub_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("SERVICEHUB_LOG", "trace"), ("RUST_LOG", "warn")]));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_split_privileged_roles() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("SERVICEHUB_PRIVILEGED_ROLES", "admin, support,,")]));
        assert_eq!(config.auth.privileged_roles, ["admin", "support"]);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_pubsub_capacity() {
        let mut config = Config::default();
        config.pubsub.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
