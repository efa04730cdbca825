//! The only sanctioned path to the database
//!
//! Every call acquires its own connection and releases it before returning,
//! whatever the outcome. Driver faults are logged as possible injection
//! attempts and collapse into [`QueryOutcome::Failed`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::dto::{FetchSpec, Fetched, QueryOutcome};
use crate::application::ports::{
    DatabaseConnection, DatabaseDriver, DatabaseError, SecurityLog, SecurityLogExt,
};
use crate::config::DatabaseSettings;
use crate::domain::entities::{BoundStatement, BoundValues, ConnectionProfile, PreparedStatement};
use crate::domain::errors::ConfigurationError;

pub struct QueryExecutor {
    profile: ConnectionProfile,
    driver: Arc<dyn DatabaseDriver>,
    log: Arc<dyn SecurityLog>,
}

impl QueryExecutor {
    pub fn new(
        profile: ConnectionProfile,
        driver: Arc<dyn DatabaseDriver>,
        log: Arc<dyn SecurityLog>,
    ) -> Self {
        Self {
            profile,
            driver,
            log,
        }
    }

    /// Build the connection profile from raw settings. Nothing is opened yet.
    pub fn configure(
        settings: &DatabaseSettings,
        driver: Arc<dyn DatabaseDriver>,
        log: Arc<dyn SecurityLog>,
    ) -> Result<Self, ConfigurationError> {
        let profile = ConnectionProfile::configure(
            &settings.driver,
            &settings.host,
            &settings.name,
            &settings.user,
            &settings.password,
        )?;

        Ok(Self::new(profile, driver, log))
    }

    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    /// Run `sql` with every caller value bound to its placeholder.
    ///
    /// Returns the fetched shape when `fetch` is given, `Done` otherwise.
    pub async fn execute(
        &self,
        sql: &str,
        values: &BoundValues,
        fetch: Option<FetchSpec>,
    ) -> QueryOutcome {
        let statement = PreparedStatement::parse_for(sql, self.profile.kind());
        let bound = match statement.bind(values, self.profile.kind()) {
            Ok(bound) => bound,
            Err(e) => return self.fail(DatabaseError::from(e)),
        };

        self.run(bound, fetch).await
    }

    /// Run literal SQL with nothing to bind.
    ///
    /// This path is for fixed and administrative statements. Caller-supplied
    /// values must go through [`QueryExecutor::execute`]; a template with
    /// placeholders is refused here.
    pub async fn query(&self, sql: &str, fetch: Option<FetchSpec>) -> QueryOutcome {
        let statement = PreparedStatement::parse_for(sql, self.profile.kind());
        if statement.has_placeholders() {
            return self.fail(DatabaseError::Bind(
                "literal query contains placeholders; use execute with bound values".to_string(),
            ));
        }

        self.run(
            BoundStatement {
                sql: sql.to_string(),
                params: Vec::new(),
            },
            fetch,
        )
        .await
    }

    async fn run(&self, statement: BoundStatement, fetch: Option<FetchSpec>) -> QueryOutcome {
        let mut conn = match self.driver.connect(&self.profile).await {
            Ok(conn) => conn,
            Err(e) => return self.fail(e),
        };
        debug!(database = %self.profile.connection_string(), "Connection acquired");

        let result = Self::run_on(conn.as_mut(), &statement, fetch).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection cleanly");
        }
        debug!("Connection released");

        match result {
            Ok(outcome) => outcome,
            Err(e) => self.fail(e),
        }
    }

    async fn run_on(
        conn: &mut dyn DatabaseConnection,
        statement: &BoundStatement,
        fetch: Option<FetchSpec>,
    ) -> Result<QueryOutcome, DatabaseError> {
        conn.prepare(&statement.sql).await?;

        match fetch {
            Some(spec) => {
                let rows = conn.fetch_all(&statement.sql, &statement.params).await?;
                Ok(QueryOutcome::Fetched(Fetched::from_rows(rows, spec)))
            }
            None => {
                let rows_affected = conn.execute(&statement.sql, &statement.params).await?;
                Ok(QueryOutcome::Done { rows_affected })
            }
        }
    }

    fn fail(&self, error: DatabaseError) -> QueryOutcome {
        let message = match &error {
            DatabaseError::Bind(detail) => {
                format!("Possible SQL injection, parameter binding rejected: {}", detail)
            }
            other => format!("Possible SQL injection: {}", other),
        };

        warn!(error = %error, "Database call failed");
        self.log.record(&message);

        QueryOutcome::Failed
    }
}
