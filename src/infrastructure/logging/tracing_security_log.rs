use tracing::warn;

use crate::application::ports::{SecurityLog, SecurityLogError};

/// Security log forwarded to the tracing subscriber (for development)
pub struct TracingSecurityLog;

impl SecurityLog for TracingSecurityLog {
    fn append(&self, line: &str) -> Result<(), SecurityLogError> {
        warn!(target: "security", "SECURITY: {}", line.trim_end());
        Ok(())
    }
}
