use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigurationError;

/// Database engine a connection profile targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Mysql,
    Postgres,
    Sqlite,
    Mssql,
    Oracle,
}

impl DriverKind {
    /// Default TCP port, if the engine has one
    pub fn default_port(&self) -> Option<u16> {
        match self {
            DriverKind::Postgres => Some(5432),
            _ => None,
        }
    }
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverKind::Mysql => write!(f, "mysql"),
            DriverKind::Postgres => write!(f, "postgres"),
            DriverKind::Sqlite => write!(f, "sqlite"),
            DriverKind::Mssql => write!(f, "mssql"),
            DriverKind::Oracle => write!(f, "oracle"),
        }
    }
}

impl std::str::FromStr for DriverKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(DriverKind::Mysql),
            "postgres" | "postgresql" | "pgsql" => Ok(DriverKind::Postgres),
            "sqlite" => Ok(DriverKind::Sqlite),
            "mssql" | "sqlsrv" => Ok(DriverKind::Mssql),
            "oracle" | "oci" => Ok(DriverKind::Oracle),
            _ => Err(ConfigurationError::UnsupportedDriver(s.to_string())),
        }
    }
}
