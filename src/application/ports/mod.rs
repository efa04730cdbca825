mod database;
mod security_log;
mod session_store;

pub use database::{DatabaseConnection, DatabaseDriver, DatabaseError};
pub use security_log::{SecurityLog, SecurityLogError, SecurityLogExt};
pub use session_store::SessionStore;

#[cfg(test)]
pub use security_log::MockSecurityLog;
#[cfg(test)]
pub use session_store::MockSessionStore;
