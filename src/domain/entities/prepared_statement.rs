use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::value_objects::{DriverKind, SqlValue};

/// Marker inside a SQL template that receives a bound value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `:name`
    Named(String),
    /// `?`, numbered from 1 in order of appearance
    Positional(usize),
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placeholder::Named(name) => write!(f, ":{}", name),
            Placeholder::Positional(index) => write!(f, "?{}", index),
        }
    }
}

/// Keys may be written with or without the leading colon
impl From<&str> for Placeholder {
    fn from(key: &str) -> Self {
        Placeholder::Named(key.trim_start_matches(':').to_string())
    }
}

impl From<String> for Placeholder {
    fn from(key: String) -> Self {
        Placeholder::from(key.as_str())
    }
}

impl From<usize> for Placeholder {
    fn from(index: usize) -> Self {
        Placeholder::Positional(index)
    }
}

/// Values a caller supplies for a template, keyed by placeholder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundValues(BTreeMap<Placeholder, SqlValue>);

impl BoundValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: impl Into<Placeholder>, value: impl Into<SqlValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &Placeholder) -> Option<&SqlValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Placeholder> {
        self.0.keys()
    }
}

impl<K: Into<Placeholder>, V: Into<SqlValue>> FromIterator<(K, V)> for BoundValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("template mixes named and positional placeholders")]
    MixedPlaceholders,

    #[error("no value bound for placeholder {0}")]
    Unbound(Placeholder),

    #[error("value bound to {0}, which the template does not contain")]
    UnknownPlaceholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Sql(String),
    Param(Placeholder),
}

/// A SQL template split into literal text and placeholders.
///
/// Caller values are never spliced into the text: binding renders only the
/// dialect's positional markers and returns the values alongside, in the
/// order the markers appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    template: String,
    segments: Vec<Segment>,
}

/// Statement text in the target dialect plus its ordered parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl PreparedStatement {
    /// Parse with standard SQL quoting only
    pub fn parse(template: &str) -> Self {
        Self {
            template: template.to_string(),
            segments: split_template(template, None),
        }
    }

    /// Parse with the quoting rules of `dialect`: backslash escapes inside
    /// MySQL literals and `$tag$…$tag$` strings in Postgres.
    pub fn parse_for(template: &str, dialect: DriverKind) -> Self {
        Self {
            template: template.to_string(),
            segments: split_template(template, Some(dialect)),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(p) => Some(p),
            Segment::Sql(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Pair every placeholder with its value and render the template for
    /// `dialect`. Every placeholder needs a value and every value needs a
    /// placeholder.
    pub fn bind(
        &self,
        values: &BoundValues,
        dialect: DriverKind,
    ) -> Result<BoundStatement, BindError> {
        let named = self
            .placeholders()
            .any(|p| matches!(p, Placeholder::Named(_)));
        let positional = self
            .placeholders()
            .any(|p| matches!(p, Placeholder::Positional(_)));
        if named && positional {
            return Err(BindError::MixedPlaceholders);
        }

        if let Some(extra) = values
            .keys()
            .find(|key| !self.placeholders().any(|p| p == *key))
        {
            return Err(BindError::UnknownPlaceholder(extra.clone()));
        }

        let mut sql = String::with_capacity(self.template.len());
        let mut params = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Sql(text) => sql.push_str(text),
                Segment::Param(placeholder) => {
                    let value = values
                        .get(placeholder)
                        .ok_or_else(|| BindError::Unbound(placeholder.clone()))?;
                    params.push(value.clone());
                    push_marker(&mut sql, dialect, params.len());
                }
            }
        }

        Ok(BoundStatement { sql, params })
    }
}

fn push_marker(sql: &mut String, dialect: DriverKind, position: usize) {
    match dialect {
        DriverKind::Postgres => sql.push_str(&format!("${}", position)),
        DriverKind::Mysql | DriverKind::Sqlite => sql.push('?'),
        DriverKind::Mssql => sql.push_str(&format!("@p{}", position)),
        DriverKind::Oracle => sql.push_str(&format!(":{}", position)),
    }
}

/// Split a template into text and placeholders, skipping quoted literals,
/// quoted identifiers, comments and `::` casts. `??` is a literal `?`, as
/// needed for the Postgres jsonb operators.
fn split_template(template: &str, dialect: Option<DriverKind>) -> Vec<Segment> {
    let backslash_escapes = dialect == Some(DriverKind::Mysql);
    let chars: Vec<char> = template.chars().collect();
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut next_position = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                let end = find_closing_quote(&chars, i + 1, c, backslash_escapes);
                text.extend(&chars[i..end]);
                i = end;
            }
            '`' => {
                let end = find_closing_quote(&chars, i + 1, c, false);
                text.extend(&chars[i..end]);
                i = end;
            }
            '$' if dialect == Some(DriverKind::Postgres) => {
                let end = find_dollar_quote_end(&chars, i).unwrap_or(i + 1);
                text.extend(&chars[i..end]);
                i = end;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == '\n')
                    .map_or(chars.len(), |p| i + p);
                text.extend(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = (i + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
                    .map_or(chars.len(), |j| j + 2);
                text.extend(&chars[i..end]);
                i = end;
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                text.push_str("::");
                i += 2;
            }
            ':' if chars
                .get(i + 1)
                .is_some_and(|ch| ch.is_ascii_alphabetic() || *ch == '_') =>
            {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_'))
                    .map_or(chars.len(), |p| start + p);
                flush(&mut segments, &mut text);
                segments.push(Segment::Param(Placeholder::Named(
                    chars[start..end].iter().collect(),
                )));
                i = end;
            }
            '?' if chars.get(i + 1) == Some(&'?') => {
                text.push('?');
                i += 2;
            }
            '?' => {
                flush(&mut segments, &mut text);
                segments.push(Segment::Param(Placeholder::Positional(next_position)));
                next_position += 1;
                i += 1;
            }
            _ => {
                text.push(c);
                i += 1;
            }
        }
    }
    flush(&mut segments, &mut text);

    segments
}

/// Index just past the closing quote; a doubled quote is an escaped quote.
/// An unterminated literal runs to the end of the template.
fn find_closing_quote(
    chars: &[char],
    mut i: usize,
    quote: char,
    backslash_escapes: bool,
) -> usize {
    while i < chars.len() {
        if backslash_escapes && chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i] == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

/// For a `$tag$` opener at `start`, the index just past the matching closer.
/// `None` when `start` is not an opener (e.g. a `$1` marker).
fn find_dollar_quote_end(chars: &[char], start: usize) -> Option<usize> {
    let tag_len = chars[start + 1..]
        .iter()
        .position(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_'))?;
    let tag_end = start + 1 + tag_len;
    if chars[tag_end] != '$' || chars.get(start + 1).is_some_and(|ch| ch.is_ascii_digit()) {
        return None;
    }

    let delimiter = &chars[start..=tag_end];
    let body = tag_end + 1;
    let close = (body..=chars.len().saturating_sub(delimiter.len()))
        .find(|&j| chars[j..].starts_with(delimiter))
        .map_or(chars.len(), |j| j + delimiter.len());

    Some(close)
}

fn flush(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Sql(std::mem::take(text)));
    }
}
