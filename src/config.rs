use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::guards::SanitizerConfig;
use crate::domain::errors::ConfigurationError;
use crate::domain::value_objects::DriverKind;

/// Raw database settings as an operator writes them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub driver: String,
    #[serde(default)]
    pub host: String,
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File receiving the security log
    pub log_file: PathBuf,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_file: std::env::var("ARMOR_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs.log")),
            database: DatabaseSettings {
                driver: std::env::var("DB_DRIVER").unwrap_or_else(|_| "mysql".to_string()),
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                name: std::env::var("DB_NAME").unwrap_or_default(),
                user: std::env::var("DB_USER").unwrap_or_default(),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            },
            // Newline-separated so patterns may contain commas
            sanitizer: SanitizerConfig {
                extra_patterns: std::env::var("ARMOR_EXTRA_XSS_PATTERNS")
                    .map(|s| {
                        s.lines()
                            .map(str::trim)
                            .filter(|p| !p.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(s).map_err(|e| ConfigurationError::invalid_setting("config", e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::invalid_setting("config", format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_log_file()?;
        self.validate_database()
    }

    pub fn validate_log_file(&self) -> Result<(), ConfigurationError> {
        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigurationError::invalid_setting(
                "ARMOR_LOG_FILE",
                "cannot be empty",
            ));
        }
        Ok(())
    }

    /// Database settings only; callers that never connect can skip this
    pub fn validate_database(&self) -> Result<(), ConfigurationError> {
        let kind: DriverKind = self.database.driver.parse()?;

        if self.database.name.trim().is_empty() {
            return Err(ConfigurationError::invalid_setting(
                "DB_NAME",
                "cannot be empty",
            ));
        }
        if kind != DriverKind::Sqlite && self.database.host.trim().is_empty() {
            return Err(ConfigurationError::invalid_setting(
                "DB_HOST",
                "cannot be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
log_file = "/var/log/armor/security.log"

[database]
driver = "pgsql"
host = "db.internal"
name = "app"
user = "app"
password = "s3cret"

[sanitizer]
extra_patterns = ["javascript\\s*:"]
"#;

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.log_file, PathBuf::from("/var/log/armor/security.log"));
        assert_eq!(config.database.driver, "pgsql");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.sanitizer.extra_patterns, vec![r"javascript\s*:".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sanitizer_section_is_optional() {
        let config = Config::from_toml_str(
            "log_file = \"x.log\"\n[database]\ndriver = \"sqlite\"\nname = \"app\"\n",
        )
        .unwrap();

        assert!(config.sanitizer.extra_patterns.is_empty());
        assert!(config.database.host.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        assert!(matches!(
            Config::from_toml_str("log_file = "),
            Err(ConfigurationError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_driver() {
        let mut config = Config::from_toml_str(SAMPLE).unwrap();
        config.database.driver = "mongodb".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::UnsupportedDriver(_))
        ));
    }

    #[test]
    fn test_validate_requires_database_name_and_host() {
        let mut config = Config::from_toml_str(SAMPLE).unwrap();
        config.database.name = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::from_toml_str(SAMPLE).unwrap();
        config.database.host = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_file_validation_ignores_database() {
        let mut config = Config::from_toml_str(SAMPLE).unwrap();
        config.database.name = String::new();

        assert!(config.validate_log_file().is_ok());
        assert!(config.validate_database().is_err());

        config.log_file = PathBuf::new();
        assert!(config.validate_log_file().is_err());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Config::from_toml_file(Path::new("/nonexistent/armor.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/armor.toml"));
    }
}
