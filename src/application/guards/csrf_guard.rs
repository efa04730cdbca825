//! Single-use, per-session anti-forgery tokens
//!
//! A session moves `NoToken → Issued → Consumed`; issuing again while a
//! token is outstanding replaces it, so the earlier token can never validate.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::guards::content_sanitizer::escape_html;
use crate::application::ports::{SecurityLog, SecurityLogExt, SessionStore};
use crate::domain::value_objects::{CsrfToken, RequestFieldMap};

/// Session key holding the expected token
pub const CSRF_SESSION_KEY: &str = "_csrf_token";

/// Form field carrying the submitted token
pub const CSRF_FIELD_NAME: &str = "csrf_token";

/// Token lifecycle as observed from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfState {
    NoToken,
    Issued,
}

/// A freshly issued token, ready to embed in a form
#[derive(Debug, Clone)]
pub struct IssuedToken {
    token: CsrfToken,
}

impl IssuedToken {
    pub fn token(&self) -> &CsrfToken {
        &self.token
    }

    pub fn field_name(&self) -> &'static str {
        CSRF_FIELD_NAME
    }

    /// `<input type="hidden" name="csrf_token" value="…">`
    pub fn hidden_input(&self) -> String {
        format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            CSRF_FIELD_NAME,
            escape_html(self.token.as_str())
        )
    }
}

pub struct CsrfGuard {
    log: Arc<dyn SecurityLog>,
}

impl CsrfGuard {
    pub fn new(log: Arc<dyn SecurityLog>) -> Self {
        Self { log }
    }

    /// Generate a token and make it the only one `session` accepts
    pub fn issue(&self, session: &mut dyn SessionStore) -> IssuedToken {
        let token = CsrfToken::generate();
        session.set(CSRF_SESSION_KEY, token.as_str().to_string());
        debug!("Issued CSRF token");

        IssuedToken { token }
    }

    pub fn state(&self, session: &dyn SessionStore) -> CsrfState {
        match stored_token(session) {
            Some(_) => CsrfState::Issued,
            None => CsrfState::NoToken,
        }
    }

    /// Check the submitted token against the one stored in `session`.
    ///
    /// On success the stored token is consumed and the token field is removed
    /// from `fields`, so downstream code only sees ordinary form data.
    pub fn validate(&self, session: &mut dyn SessionStore, fields: &mut RequestFieldMap) -> bool {
        let Some(expected) = stored_token(session) else {
            warn!("CSRF validation failed: no CSRF token on server side");
            self.log.record(
                "CSRF validation failed: no CSRF token on server side \
                 (session expired or request replayed)",
            );
            return false;
        };

        let submitted = fields
            .get_str(CSRF_FIELD_NAME)
            .filter(|token| !token.is_empty());
        if !submitted.is_some_and(|token| expected.matches(token)) {
            warn!("CSRF validation failed: token mismatch");
            self.log
                .record("CSRF token mismatch, request from unknown source");
            return false;
        }

        session.delete(CSRF_SESSION_KEY);
        fields.remove(CSRF_FIELD_NAME);
        debug!("CSRF token consumed");

        true
    }
}

/// The stored token, treating an empty slot as no token at all
fn stored_token(session: &dyn SessionStore) -> Option<CsrfToken> {
    session
        .get(CSRF_SESSION_KEY)
        .filter(|token| !token.is_empty())
        .map(CsrfToken::from_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockSecurityLog, MockSessionStore};
    use crate::infrastructure::logging::MemorySecurityLog;
    use crate::infrastructure::session::MemorySessionStore;

    fn guard() -> (CsrfGuard, Arc<MemorySecurityLog>) {
        let log = Arc::new(MemorySecurityLog::new());
        (CsrfGuard::new(log.clone()), log)
    }

    fn submission(token: &str) -> RequestFieldMap {
        RequestFieldMap::new()
            .with_field("comment", "hello")
            .with_field(CSRF_FIELD_NAME, token)
    }

    #[test]
    fn test_issue_stores_64_hex_token() {
        let (guard, _) = guard();
        let mut session = MemorySessionStore::new();

        let issued = guard.issue(&mut session);

        assert_eq!(issued.token().as_str().len(), 64);
        assert!(issued.token().as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            session.get(CSRF_SESSION_KEY).as_deref(),
            Some(issued.token().as_str())
        );
        assert_eq!(guard.state(&session), CsrfState::Issued);
    }

    #[test]
    fn test_hidden_input_rendering() {
        let (guard, _) = guard();
        let mut session = MemorySessionStore::new();

        let issued = guard.issue(&mut session);

        assert_eq!(issued.field_name(), "csrf_token");
        assert_eq!(
            issued.hidden_input(),
            format!(
                "<input type=\"hidden\" name=\"csrf_token\" value=\"{}\">",
                issued.token()
            )
        );
    }

    #[test]
    fn test_validate_succeeds_once_then_fails() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();
        let token = guard.issue(&mut session).token().as_str().to_string();

        let mut fields = submission(&token);
        assert!(guard.validate(&mut session, &mut fields));
        assert!(!fields.contains(CSRF_FIELD_NAME), "token field is stripped");
        assert_eq!(fields.get_str("comment"), Some("hello"));
        assert_eq!(guard.state(&session), CsrfState::NoToken);
        assert!(log.is_empty());

        let mut replay = submission(&token);
        assert!(!guard.validate(&mut session, &mut replay));
        assert!(replay.contains(CSRF_FIELD_NAME));
        assert_eq!(log.len(), 1);
        assert!(log.lines()[0].contains("no CSRF token on server side"));
    }

    #[test]
    fn test_reissue_invalidates_previous_token() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();

        let first = guard.issue(&mut session).token().clone();
        let second = guard.issue(&mut session).token().clone();
        assert_ne!(first, second);

        assert!(!guard.validate(&mut session, &mut submission(first.as_str())));
        assert!(log.lines()[0].contains("mismatch"));
        assert_eq!(guard.state(&session), CsrfState::Issued);

        assert!(guard.validate(&mut session, &mut submission(second.as_str())));
    }

    #[test]
    fn test_single_character_difference_fails() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();
        let token = guard.issue(&mut session).token().as_str().to_string();

        let mut tampered = token.clone();
        let first = if tampered.starts_with('a') { "b" } else { "a" };
        tampered.replace_range(0..1, first);

        assert!(!guard.validate(&mut session, &mut submission(&tampered)));
        assert_eq!(log.len(), 1);
        // A failed attempt does not consume the real token
        assert!(guard.validate(&mut session, &mut submission(&token)));
    }

    #[test]
    fn test_missing_or_non_string_field_is_mismatch() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();
        guard.issue(&mut session);

        let mut missing = RequestFieldMap::new().with_field("comment", "hi");
        assert!(!guard.validate(&mut session, &mut missing));

        let mut numeric = RequestFieldMap::new().with_field(CSRF_FIELD_NAME, 12345);
        assert!(!guard.validate(&mut session, &mut numeric));

        assert_eq!(log.len(), 2);
        assert!(log.lines().iter().all(|l| l.contains("mismatch")));
    }

    #[test]
    fn test_empty_stored_token_counts_as_no_token() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();
        session.set(CSRF_SESSION_KEY, String::new());

        assert_eq!(guard.state(&session), CsrfState::NoToken);

        let mut missing = RequestFieldMap::new().with_field("comment", "no token");
        assert!(!guard.validate(&mut session, &mut missing));

        let mut empty = submission("");
        assert!(!guard.validate(&mut session, &mut empty));

        assert_eq!(log.len(), 2);
        assert!(log
            .lines()
            .iter()
            .all(|l| l.contains("no CSRF token on server side")));
    }

    #[test]
    fn test_empty_submitted_token_is_mismatch() {
        let (guard, log) = guard();
        let mut session = MemorySessionStore::new();
        let token = guard.issue(&mut session).token().clone();

        let mut empty = submission("");
        assert!(!guard.validate(&mut session, &mut empty));
        assert!(log.lines()[0].contains("mismatch"));
        assert!(empty.contains(CSRF_FIELD_NAME));

        // Still valid for the real submission
        assert!(guard.validate(&mut session, &mut submission(token.as_str())));
    }

    #[test]
    fn test_validate_without_issue_logs_no_token() {
        let mut log = MockSecurityLog::new();
        log.expect_append()
            .withf(|line: &str| line.contains("no CSRF token on server side"))
            .times(1)
            .returning(|_| Ok(()));
        let guard = CsrfGuard::new(Arc::new(log));
        let mut session = MemorySessionStore::new();

        assert!(!guard.validate(&mut session, &mut submission("deadbeef")));
    }

    #[test]
    fn test_success_deletes_session_key() {
        let mut session = MockSessionStore::new();
        session
            .expect_get()
            .withf(|key: &str| key == CSRF_SESSION_KEY)
            .times(1)
            .returning(|_| Some("abc".to_string()));
        session
            .expect_delete()
            .withf(|key: &str| key == CSRF_SESSION_KEY)
            .times(1)
            .return_const(());
        let (guard, _) = guard();

        assert!(guard.validate(&mut session, &mut submission("abc")));
    }
}
