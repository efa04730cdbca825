mod connection_profile;
mod log_entry;
mod prepared_statement;

pub use connection_profile::{ConnectionProfile, Credentials};
pub use log_entry::{LogEntry, LOG_TIMESTAMP_FORMAT};
pub use prepared_statement::{
    BindError, BoundStatement, BoundValues, Placeholder, PreparedStatement,
};
