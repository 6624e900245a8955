//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `tallyd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use tally_adapter_homeassistant::HaConfig;
use tally_domain::status::StatusClassifier;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings (used when Home Assistant is not configured).
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device classification settings.
    pub device: DeviceConfig,
    /// Home Assistant settings; when present, state lives in its helpers
    /// and the sensor poller runs.
    pub homeassistant: Option<HaConfig>,
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

/// Status classification configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Status values treated as inactive; empty means the built-in set
    /// (`off`, `unavailable`, `unknown`).
    pub inactive_states: Vec<String>,
}

impl DeviceConfig {
    /// Build the classifier this configuration describes.
    #[must_use]
    pub fn classifier(&self) -> StatusClassifier {
        if self.inactive_states.is_empty() {
            StatusClassifier::default()
        } else {
            StatusClassifier::new(self.inactive_states.iter().cloned())
        }
    }
}

impl Config {
    /// Load configuration from `tallyd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("tallyd.toml")?;
        config.apply_env_overrides();
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

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TALLYD_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("TALLYD_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("TALLYD_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("TALLYD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(ha) = self.homeassistant.as_mut() {
            if let Ok(val) = std::env::var("TALLYD_HA_TOKEN") {
                ha.token = val;
            }
            if let Ok(val) = std::env::var("TALLYD_HA_BASE_URL") {
                ha.base_url = val;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if let Some(ha) = &self.homeassistant {
            if ha.base_url.is_empty() {
                return Err(ConfigError::Validation(
                    "homeassistant.base_url must not be empty".to_string(),
                ));
            }
            if ha.token.is_empty() {
                return Err(ConfigError::Validation(
                    "homeassistant.token must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
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
            url: "sqlite:tally.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tallyd=info,tally=info,tower_http=debug".to_string(),
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
    use tally_domain::status::Activity;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:tally.db?mode=rwc");
        assert!(config.homeassistant.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.device.inactive_states.is_empty());
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

            [device]
            inactive_states = ['standby', 'off']

            [homeassistant]
            base_url = 'http://ha.local:8123'
            token = 'secret'
            poll_interval_secs = 10
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.device.inactive_states, vec!["standby", "off"]);
        let ha = config.homeassistant.unwrap();
        assert_eq!(ha.base_url, "http://ha.local:8123");
        assert_eq!(ha.poll_interval_secs, 10);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_homeassistant_section_without_token() {
        let toml = "
            [homeassistant]
            base_url = 'http://ha.local:8123'
            token = ''
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_format_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_use_builtin_inactive_states_when_list_is_empty() {
        let classifier = DeviceConfig::default().classifier();
        assert_eq!(classifier.classify("off"), Activity::Inactive);
        assert_eq!(classifier.classify("running"), Activity::Active);
    }

    #[test]
    fn should_use_configured_inactive_states() {
        let device = DeviceConfig {
            inactive_states: vec!["standby".to_string()],
        };
        let classifier = device.classifier();
        assert_eq!(classifier.classify("standby"), Activity::Inactive);
        // The built-in set no longer applies.
        assert_eq!(classifier.classify("off"), Activity::Active);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
