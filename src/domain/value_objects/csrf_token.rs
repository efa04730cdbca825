use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Number of random bytes behind a CSRF token (256 bits)
pub const CSRF_TOKEN_BYTES: usize = 32;

/// Anti-forgery token, rendered as lowercase hex
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a fresh token from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; CSRF_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a token read back from session storage
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Timing-safe comparison against a submitted value.
    ///
    /// Both sides are reduced to fixed-size SHA-256 digests first, so neither
    /// the submitted length nor the position of the first differing byte
    /// changes how long the comparison takes.
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = Sha256::digest(self.0.as_bytes());
        let actual = Sha256::digest(submitted.as_bytes());
        expected.as_slice().ct_eq(actual.as_slice()).into()
    }
}

// Tokens are secrets; keep them out of Debug output.
impl std::fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CsrfToken").field(&"<redacted>").finish()
    }
}

impl std::fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
