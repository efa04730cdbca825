use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::Row;
use crate::domain::entities::{BindError, ConnectionProfile};
use crate::domain::value_objects::SqlValue;

/// Failures of the database collaborator, by stage
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to prepare statement: {0}")]
    Prepare(String),

    #[error("Failed to bind parameters: {0}")]
    Bind(String),

    #[error("Failed to execute statement: {0}")]
    Execution(String),
}

impl From<BindError> for DatabaseError {
    fn from(err: BindError) -> Self {
        DatabaseError::Bind(err.to_string())
    }
}

/// Opens connections for a profile
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<Box<dyn DatabaseConnection>, DatabaseError>;
}

/// One live connection.
///
/// `sql` is always already rendered in the connection's dialect and `params`
/// carry every value in marker order.
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Ask the server to prepare `sql` without running it
    async fn prepare(&mut self, sql: &str) -> Result<(), DatabaseError>;

    /// Run a statement, returning the affected row count
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError>;

    /// Run a statement and collect its rows
    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue])
        -> Result<Vec<Row>, DatabaseError>;

    /// Release the connection
    async fn close(self: Box<Self>) -> Result<(), DatabaseError>;
}
