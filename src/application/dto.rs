use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SqlValue;

/// How each fetched row is keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Column name → value
    #[default]
    Assoc,
    /// Values by column index
    Num,
    /// Both names and indexes
    Both,
}

/// Which rows of the result are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMethod {
    /// First row only
    One,
    /// Every row
    All,
    /// One column of the first row
    Column(usize),
}

/// Requested result shape for a statement that returns rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSpec {
    pub mode: FetchMode,
    pub method: FetchMethod,
}

impl FetchSpec {
    pub fn new(mode: FetchMode, method: FetchMethod) -> Self {
        Self { mode, method }
    }

    pub fn one(mode: FetchMode) -> Self {
        Self::new(mode, FetchMethod::One)
    }

    pub fn all(mode: FetchMode) -> Self {
        Self::new(mode, FetchMethod::All)
    }

    pub fn column(index: usize) -> Self {
        Self::new(FetchMode::Num, FetchMethod::Column(index))
    }
}

/// Raw row as read from the database
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    pub fn shape(self, mode: FetchMode) -> ShapedRow {
        match mode {
            FetchMode::Assoc => {
                ShapedRow::Assoc(self.columns.into_iter().zip(self.values).collect())
            }
            FetchMode::Num => ShapedRow::Num(self.values),
            FetchMode::Both => ShapedRow::Both(self),
        }
    }
}

/// A row keyed according to the requested [`FetchMode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapedRow {
    Assoc(Vec<(String, SqlValue)>),
    Num(Vec<SqlValue>),
    Both(Row),
}

impl ShapedRow {
    /// Look up by column name; `None` for index-only rows
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        match self {
            ShapedRow::Assoc(pairs) => pairs.iter().find(|(c, _)| c == column).map(|(_, v)| v),
            ShapedRow::Num(_) => None,
            ShapedRow::Both(row) => row.get(column),
        }
    }

    /// Look up by position; `None` for name-only rows
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        match self {
            ShapedRow::Assoc(_) => None,
            ShapedRow::Num(values) => values.get(index),
            ShapedRow::Both(row) => row.get_index(index),
        }
    }
}

/// Rows returned for a [`FetchSpec`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fetched {
    Row(Option<ShapedRow>),
    Rows(Vec<ShapedRow>),
    Column(Option<SqlValue>),
}

impl Fetched {
    pub fn from_rows(rows: Vec<Row>, spec: FetchSpec) -> Self {
        match spec.method {
            FetchMethod::One => Fetched::Row(rows.into_iter().next().map(|r| r.shape(spec.mode))),
            FetchMethod::All => {
                Fetched::Rows(rows.into_iter().map(|r| r.shape(spec.mode)).collect())
            }
            FetchMethod::Column(index) => Fetched::Column(
                rows.into_iter()
                    .next()
                    .and_then(|r| r.values.into_iter().nth(index)),
            ),
        }
    }
}

/// Result of an executor call. Every failure collapses into `Failed`;
/// details go to the security log only.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Done { rows_affected: u64 },
    Fetched(Fetched),
    Failed,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, QueryOutcome::Failed)
    }

    pub fn into_fetched(self) -> Option<Fetched> {
        match self {
            QueryOutcome::Fetched(fetched) => Some(fetched),
            _ => None,
        }
    }
}
