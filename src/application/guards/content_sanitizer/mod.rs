//! Script-injection detection for inbound request fields
//!
//! Every top-level string field is matched against an ordered set of
//! case-insensitive signatures. Detection is advisory: the caller decides
//! whether to reject the request. Regular expressions over markup are not a
//! parser, so this is a tripwire for known payload shapes, not a proof of
//! safety. Non-string values are not inspected.

pub mod config;
pub mod escaping;
pub mod rules;


use std::sync::Arc;

use tracing::warn;

use crate::application::ports::{SecurityLog, SecurityLogExt};
use crate::domain::errors::ConfigurationError;
use crate::domain::value_objects::RequestFieldMap;

pub use config::SanitizerConfig;
pub use escaping::{escape_html, escaped_fields_json};
pub use rules::{XssRule, BUILTIN_RULES};

/// First signature hit found in a field map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub field: String,
    pub rule: String,
}

pub struct ContentSanitizer {
    rules: Vec<XssRule>,
    log: Arc<dyn SecurityLog>,
}

impl ContentSanitizer {
    /// Sanitizer with the built-in rules only
    pub fn new(log: Arc<dyn SecurityLog>) -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
            log,
        }
    }

    /// Built-in rules followed by the configured extra patterns
    pub fn with_config(
        config: &SanitizerConfig,
        log: Arc<dyn SecurityLog>,
    ) -> Result<Self, ConfigurationError> {
        let mut rules = BUILTIN_RULES.clone();
        for (i, pattern) in config.extra_patterns.iter().enumerate() {
            rules.push(XssRule::compile(&format!("custom pattern #{}", i + 1), pattern)?);
        }

        Ok(Self { rules, log })
    }

    pub fn rules(&self) -> &[XssRule] {
        &self.rules
    }

    /// `true` when any string field carries a known script-injection shape.
    ///
    /// On detection the whole field map, escaped, goes to the security log
    /// as exactly one entry.
    pub fn scan(&self, fields: &RequestFieldMap) -> bool {
        let Some(detection) = self.detect(fields) else {
            return false;
        };

        warn!(
            field = %detection.field,
            rule = %detection.rule,
            "XSS security threat detected"
        );
        self.log.record(&format!(
            "XSS security threat detected ({}) in field '{}': {}",
            detection.rule,
            escape_html(&detection.field),
            escaped_fields_json(fields)
        ));

        true
    }

    /// Find the first matching field/rule pair without logging
    pub fn detect(&self, fields: &RequestFieldMap) -> Option<Detection> {
        fields.iter().find_map(|(name, value)| {
            let value = value.as_str()?;
            self.rules
                .iter()
                .find(|rule| rule.is_match(value))
                .map(|rule| Detection {
                    field: name.clone(),
                    rule: rule.name.clone(),
                })
        })
    }
}
