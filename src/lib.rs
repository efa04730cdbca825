//! # RequestArmor - Request Hardening Layer
//!
//! Guards that sit between untrusted request input and the rest of a web
//! application, built on Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core types (tokens, field maps, statements, connection profiles)
//! - **Application**: The guards and the ports they depend on
//! - **Infrastructure**: Adapters for logging, sessions and databases
//!
//! ## Key Features
//!
//! - Pattern-based script injection detection with an escaped security log
//! - Parameter-bound database access over a per-call connection
//! - Single-use, per-session anti-forgery tokens
//!
//! ## Example Usage
//!
//! ```no_run
//! use request_armor::guards::{ContentSanitizer, CsrfGuard};
//! use request_armor::infrastructure::logging::FileSecurityLog;
//! use request_armor::infrastructure::session::MemorySessionStore;
//! use request_armor::value_objects::RequestFieldMap;
//! use std::sync::Arc;
//!
//! let log = Arc::new(FileSecurityLog::new("logs.log"));
//! let sanitizer = ContentSanitizer::new(log.clone());
//! let csrf = CsrfGuard::new(log);
//!
//! let mut session = MemorySessionStore::new();
//! let issued = csrf.issue(&mut session);
//!
//! let mut fields = RequestFieldMap::new()
//!     .with_field("comment", "hello")
//!     .with_field("csrf_token", issued.token().as_str());
//!
//! assert!(!sanitizer.scan(&fields));
//! assert!(csrf.validate(&mut session, &mut fields));
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use application::{dto, guards, ports};
pub use config::{Config, DatabaseSettings};
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
