use chrono::{DateTime, Utc};

/// Timestamp layout used in security log lines
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One write-once line of the security log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: DateTime<Utc>,
    message: String,
}

impl LogEntry {
    /// Entry stamped with the current time
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), message)
    }

    pub fn at(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `[timestamp] message` terminated by a newline
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.message
        )
    }
}
