use async_trait::async_trait;
use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{AnyConnection, Column as _, Connection, Executor, Row as _};
use tracing::debug;

use crate::application::dto::Row;
use crate::application::ports::{DatabaseConnection, DatabaseDriver, DatabaseError};
use crate::domain::entities::ConnectionProfile;
use crate::domain::value_objects::{DriverKind, SqlValue};

/// Database driver backed by `sqlx::AnyConnection`.
///
/// Postgres, MySQL and SQLite are supported. MSSQL and Oracle profiles are
/// valid configuration, but this adapter reports a connection failure for
/// them.
pub struct SqlxDriver;

impl SqlxDriver {
    pub fn new() -> Self {
        sqlx::any::install_default_drivers();
        Self
    }

    fn supports(kind: DriverKind) -> bool {
        matches!(
            kind,
            DriverKind::Postgres | DriverKind::Mysql | DriverKind::Sqlite
        )
    }
}

impl Default for SqlxDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for SqlxDriver {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<Box<dyn DatabaseConnection>, DatabaseError> {
        if !Self::supports(profile.kind()) {
            return Err(DatabaseError::Connection(format!(
                "no sqlx driver available for {}",
                profile.kind()
            )));
        }

        let url = profile
            .connection_url()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        let conn = AnyConnection::connect(url.as_str())
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        debug!(database = %profile.connection_string(), "Opened sqlx connection");

        Ok(Box::new(SqlxConnection { conn }))
    }
}

struct SqlxConnection {
    conn: AnyConnection,
}

#[async_trait]
impl DatabaseConnection for SqlxConnection {
    async fn prepare(&mut self, sql: &str) -> Result<(), DatabaseError> {
        (&mut self.conn)
            .prepare(sql)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Prepare(e.to_string()))
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError> {
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut self.conn)
            .await
            .map_err(|e| DatabaseError::Execution(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn fetch_all(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, DatabaseError> {
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| DatabaseError::Execution(e.to_string()))?;

        rows.iter().map(decode_row).collect()
    }

    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        self.conn
            .close()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Any, AnyArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Bytes(v) => query.bind(v.clone()),
        };
    }
    query
}

fn decode_row(row: &AnyRow) -> Result<Row, DatabaseError> {
    let columns: Vec<String> = row
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let values = (0..columns.len())
        .map(|i| decode_value(row, i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row::new(columns, values))
}

/// Decode by trying each supported type in turn; NULL decodes as `None`
/// under the first attempt.
fn decode_value(row: &AnyRow, index: usize) -> Result<SqlValue, DatabaseError> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Ok(v.into());
    }

    Err(DatabaseError::Execution(format!(
        "unsupported column type at index {}",
        index
    )))
}
