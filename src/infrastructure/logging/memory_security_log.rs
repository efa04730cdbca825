use parking_lot::Mutex;

use crate::application::ports::{SecurityLog, SecurityLogError};

/// Security log kept in memory, for tests and embedding
#[derive(Default)]
pub struct MemorySecurityLog {
    lines: Mutex<Vec<String>>,
}

impl MemorySecurityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl SecurityLog for MemorySecurityLog {
    fn append(&self, line: &str) -> Result<(), SecurityLogError> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SecurityLogExt;

    #[test]
    fn test_lines_are_kept_in_order() {
        let log = MemorySecurityLog::new();
        assert!(log.is_empty());

        log.record("first");
        log.record("second");

        let lines = log.lines();
        assert_eq!(log.len(), 2);
        assert!(lines[0].ends_with("] first\n"));
        assert!(lines[1].ends_with("] second\n"));
    }
}
