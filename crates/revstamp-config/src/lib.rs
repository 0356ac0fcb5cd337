#![deny(unsafe_code)]

//! Configuration loading and validation for revstamp.
//!
//! Loads TOML configuration files and validates them. The [`AppConfig`] type
//! carries the manually supplied version override, the import path used to
//! find the program's own entry in the embedded dependency list, and the
//! logging level.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Import path of the core crate as it appears in the dependency list.
pub const DEFAULT_IMPORT_PATH: &str = "revstamp-core";

/// Log levels accepted by `logging.level`.
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version resolution settings.
    #[serde(default)]
    pub version: VersionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Version resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Manually supplied version that takes precedence over derived values.
    /// Useful for downstream packagers. An empty string counts as unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_version: Option<String>,

    /// Identifier of this program's own entry in the dependency list.
    #[serde(default = "default_import_path")]
    pub import_path: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            custom_version: None,
            import_path: default_import_path(),
        }
    }
}

fn default_import_path() -> String {
    DEFAULT_IMPORT_PATH.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// The configured override, if set and non-empty.
    pub fn custom_version(&self) -> Option<&str> {
        self.version
            .custom_version
            .as_deref()
            .filter(|v| !v.is_empty())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let import_path = &self.version.import_path;
        if import_path.is_empty() {
            return Err(ConfigError::Validation(
                "version.import_path must not be empty".to_string(),
            ));
        }
        if import_path.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "version.import_path must not contain whitespace, got {import_path:?}"
            )));
        }

        if let Some(custom) = self.custom_version() {
            if custom.trim() != custom {
                return Err(ConfigError::Validation(format!(
                    "version.custom_version must not have surrounding whitespace, got {custom:?}"
                )));
            }
            if custom.chars().any(char::is_control) {
                return Err(ConfigError::Validation(
                    "version.custom_version must not contain control characters".to_string(),
                ));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                VALID_LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.version.import_path, "revstamp-core");
        assert_eq!(config.version.custom_version, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [version]
            custom_version = "v2.6.2"
            import_path = "my-tool"

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.custom_version(), Some("v2.6.2"));
        assert_eq!(config.version.import_path, "my-tool");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_custom_version_counts_as_unset() {
        let toml = r#"
            [version]
            custom_version = ""
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.custom_version(), None);
    }

    #[test]
    fn test_validation_rejects_empty_import_path() {
        let toml = r#"
            [version]
            import_path = ""
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_whitespace_in_import_path() {
        let toml = r#"
            [version]
            import_path = "my tool"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_padded_custom_version() {
        let toml = r#"
            [version]
            custom_version = " v1.0.0"
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validation_rejects_control_chars_in_custom_version() {
        let mut config = AppConfig::default();
        config.version.custom_version = Some("v1\u{7}".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let toml = r#"
            [logging]
            level = "verbose"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_serialized_config_round_trips_through_parse() {
        let mut config = AppConfig::default();
        config.version.custom_version = Some("v3.0.0-rc1".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::parse(&text).unwrap(), config);
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("revstamp.toml");
        tokio::fs::write(&path, b"[version]\ncustom_version = \"v9.9.9\"\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.custom_version(), Some("v9.9.9"));
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
