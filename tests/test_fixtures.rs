//! Shared fixtures for integration tests

use std::sync::Arc;
use tempfile::TempDir;

use request_armor::guards::{ContentSanitizer, CsrfGuard, QueryExecutor};
use request_armor::infrastructure::logging::FileSecurityLog;
use request_armor::infrastructure::persistence::SqlxDriver;
use request_armor::DatabaseSettings;

/// A SQLite database file and a security log file inside one temp dir
pub struct TestEnvironment {
    pub log: Arc<FileSecurityLog>,
    pub sanitizer: ContentSanitizer,
    pub csrf: CsrfGuard,
    pub executor: QueryExecutor,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log = Arc::new(FileSecurityLog::new(temp_dir.path().join("security.log")));

        let settings = DatabaseSettings {
            driver: "sqlite".to_string(),
            host: String::new(),
            name: temp_dir
                .path()
                .join("app")
                .to_str()
                .expect("temp path is utf-8")
                .to_string(),
            user: String::new(),
            password: String::new(),
        };
        let executor = QueryExecutor::configure(&settings, Arc::new(SqlxDriver::new()), log.clone())
            .expect("Failed to configure executor");

        Self {
            sanitizer: ContentSanitizer::new(log.clone()),
            csrf: CsrfGuard::new(log.clone()),
            executor,
            log,
            _temp_dir: temp_dir,
        }
    }

    /// Security log contents, one entry per line
    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.log.path())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }
}
