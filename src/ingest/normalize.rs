//! Classification of raw text tokens from untyped source files.
//!
//! Every token becomes a [`Field`], which decides how the value is bound
//! (INTEGER or TEXT) and how it is rendered as a SQL literal in the
//! statement log.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rusqlite::types::{Null, ToSql, ToSqlOutput};
use thiserror::Error;

static DATE_TIME_RE: OnceLock<Regex> = OnceLock::new();
static WORD_RE: OnceLock<Regex> = OnceLock::new();
static DIGITS_RE: OnceLock<Regex> = OnceLock::new();

fn date_time_re() -> &'static Regex {
    DATE_TIME_RE.get_or_init(|| {
        Regex::new(r"^[0-9]+/[0-9]+/[0-9]+ [0-9]+:[0-9]+$").expect("valid date-time pattern")
    })
}

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z\x{4e00}-\x{9fff}]").expect("valid word pattern"))
}

fn digits_re() -> &'static Regex {
    DIGITS_RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("token {0:?} is not a date-time, text, integer or empty value")]
    Unclassified(String),

    #[error("integer {0} does not fit in 64 bits")]
    OutOfRange(String),
}

/// A classified source value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `D/M/Y H:M` kept verbatim.
    DateTime(String),
    Text(String),
    Integer(i64),
    /// Empty token, stored as zero.
    Empty,
    /// Absent value, e.g. an unresolved place name. Never produced by [`classify`].
    Null,
}

impl Field {
    /// Count value of the field: integers as-is, empty as zero.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Field::Integer(n) => Some(*n),
            Field::Empty => Some(0),
            _ => None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Field::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(Field::text).unwrap_or(Field::Null)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::DateTime(s) | Field::Text(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Field::Integer(n) => write!(f, "{}", n),
            Field::Empty => f.write_str("0"),
            Field::Null => f.write_str("NULL"),
        }
    }
}

impl ToSql for Field {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Field::DateTime(s) | Field::Text(s) => ToSqlOutput::from(s.as_str()),
            Field::Integer(n) => ToSqlOutput::from(*n),
            Field::Empty => ToSqlOutput::from(0i64),
            Field::Null => ToSqlOutput::from(Null),
        })
    }
}

/// Classify one token. Surrounding whitespace is ignored and the first
/// matching rule wins: date-time, text, digits, empty.
pub fn classify(token: &str) -> Result<Field, FieldError> {
    let token = token.trim();

    if date_time_re().is_match(token) {
        return Ok(Field::DateTime(token.to_string()));
    }
    if word_re().is_match(token) {
        return Ok(Field::Text(token.to_string()));
    }
    if digits_re().is_match(token) {
        return token
            .parse::<i64>()
            .map(Field::Integer)
            .map_err(|_| FieldError::OutOfRange(token.to_string()));
    }
    if token.is_empty() {
        return Ok(Field::Empty);
    }

    Err(FieldError::Unclassified(token.to_string()))
}

pub fn classify_all<'a, I>(tokens: I) -> Result<Vec<Field>, FieldError>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().map(classify).collect()
}

/// Render fields as a comma-separated SQL value list.
pub fn render_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify and render raw tokens in one go.
pub fn escaped_list<'a, I>(tokens: I) -> Result<String, FieldError>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(render_list(&classify_all(tokens)?))
}
