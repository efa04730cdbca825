use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::application::ports::{SecurityLog, SecurityLogError};

/// Security log appended to a plain text file.
///
/// The file is opened in append mode for every line and never truncated.
pub struct FileSecurityLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSecurityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecurityLog for FileSecurityLog {
    fn append(&self, line: &str) -> Result<(), SecurityLogError> {
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
