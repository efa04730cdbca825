#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::domain::entities::LogEntry;

#[derive(Debug, Error)]
pub enum SecurityLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only sink for the security forensic trail
#[cfg_attr(test, automock)]
pub trait SecurityLog: Send + Sync {
    /// Append one complete, newline-terminated line
    fn append(&self, line: &str) -> Result<(), SecurityLogError>;
}

/// Timestamped writes on top of any [`SecurityLog`]
pub trait SecurityLogExt {
    /// Timestamp `message` and append it. A failing sink never fails the
    /// caller; the failure is reported through tracing instead.
    fn record(&self, message: &str);
}

impl<T: SecurityLog + ?Sized> SecurityLogExt for T {
    fn record(&self, message: &str) {
        let entry = LogEntry::new(message);
        if let Err(e) = self.append(&entry.to_line()) {
            tracing::error!(error = %e, "Failed to write security log entry: {}", entry);
        }
    }
}
