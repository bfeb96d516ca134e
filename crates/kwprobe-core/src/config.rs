//! Configuration schema (kwprobe.toml)

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Query dialect used for discovery and probe templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectConfig {
    /// DAX dialect for Tabular analytical engines
    Tabular,

    /// SQL dialect for PostgreSQL-compatible engines
    Postgres,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::Postgres
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query dialect
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Backend connection descriptor
    #[serde(default)]
    pub connection: Option<String>,

    /// Connect with TLS
    #[serde(default)]
    pub tls: bool,

    /// Bounded per-probe timeout in milliseconds; absent means a probe
    /// blocks until the backend answers
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,

    /// Where to write the JSON report, if anywhere
    #[serde(default)]
    pub output: Option<std::path::PathBuf>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Per-probe timeout as a [`Duration`]
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.dialect, DialectConfig::Postgres);
        assert_eq!(config.connection, None);
        assert!(!config.tls);
        assert_eq!(config.probe_timeout(), None);
    }

    #[test]
    fn config_from_toml() {
        let config = Config::from_toml(
            r#"
            dialect = "tabular"
            connection = "Data Source=localhost"
            probe_timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.dialect, DialectConfig::Tabular);
        assert_eq!(config.connection.as_deref(), Some("Data Source=localhost"));
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.connection = Some("host=localhost port=5432".to_string());
        config.tls = true;

        let toml = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let result = Config::from_toml("dialect = \"oracle\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
