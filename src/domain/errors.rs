use thiserror::Error;

/// Fatal setup errors. These are raised while building guards and are never
/// swallowed by them.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid database driver: {0}")]
    UnsupportedDriver(String),

    #[error("Invalid XSS pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid setting {field}: {message}")]
    InvalidSetting { field: String, message: String },

    #[error("Invalid connection descriptor: {0}")]
    InvalidDescriptor(#[from] url::ParseError),
}

impl ConfigurationError {
    pub fn invalid_setting(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
