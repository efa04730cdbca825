use serde::{Deserialize, Serialize};

/// Content sanitizer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Extra case-insensitive patterns checked after the built-in rules
    pub extra_patterns: Vec<String>,
}

impl SanitizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern to check after the built-in rules
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.extra_patterns.push(pattern.into());
        self
    }
}
