use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::domain::errors::ConfigurationError;

/// A named script-injection signature
#[derive(Debug, Clone)]
pub struct XssRule {
    pub name: String,
    pub regex: Regex,
}

impl XssRule {
    /// Compile `pattern` case-insensitively
    pub fn compile(name: &str, pattern: &str) -> Result<Self, ConfigurationError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigurationError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Built-in signatures, in the order they are tried
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("script block", r"<script>[\s\S]*</script>"),
    ("script tag variant", r"<.*script.*>[\s\S]*</.*script.*>"),
    (
        "script nested in markup",
        r"<.*>[\s\S]*<.*>[\s\S]*<.*script.*>[\s\S]*</.*script.*>[\s\S]*<.*>[\s\S]*</.*>",
    ),
    (
        "quoted script payload",
        r#""[\s\S]*<.*script.*>[\s\S]*</.*script.*>[\s\S]*""#,
    ),
    (
        "svg embedded script",
        r"<svg>[\s\S]*<.*script.*>[\s\S]*</.*script.*>[\s\S]*</svg>",
    ),
    (
        "data uri script",
        r"data:text/html;[\s\S]*<.*script.*>[\s\S]*</.*script.*>",
    ),
    (
        "style block script",
        r"<style>[\s\S]*<.*script.*>[\s\S]*</.*script.*>[\s\S]*</style>",
    ),
];

/// Built-in rules compiled once at first use
pub static BUILTIN_RULES: Lazy<Vec<XssRule>> = Lazy::new(|| {
    BUILTIN_PATTERNS
        .iter()
        .map(|(name, pattern)| {
            XssRule::compile(name, pattern)
                .unwrap_or_else(|e| panic!("Internal error: invalid built-in XSS rule: {}", e))
        })
        .collect()
});
