pub mod content_sanitizer;
pub mod csrf_guard;
pub mod query_executor;

pub use content_sanitizer::{escape_html, ContentSanitizer, Detection, SanitizerConfig};
pub use csrf_guard::{CsrfGuard, CsrfState, IssuedToken, CSRF_FIELD_NAME, CSRF_SESSION_KEY};
pub use query_executor::QueryExecutor;
