//! Per-column value formatting.

#[cfg(feature = "chrono")]
use chrono::NaiveDate;
use thiserror::Error;

use crate::core::value::Value;

/// Error returned by [`Formatter::parse`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Column formatter. When a column has one, it replaces the generic converter
/// in both directions.
pub trait Formatter: Send + Sync {
    fn format(&self, value: &Value) -> String;

    fn parse(&self, value: &str) -> Result<Value, ParseError>;
}

/// Formats dates with a `strftime` pattern, e.g. `%d/%m/%Y`.
#[cfg(feature = "chrono")]
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
}

#[cfg(feature = "chrono")]
impl DateFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

#[cfg(feature = "chrono")]
impl Formatter for DateFormatter {
    fn format(&self, value: &Value) -> String {
        match value {
            Value::Date(date) => date.format(&self.pattern).to_string(),
            Value::DateTime(datetime) => datetime.format(&self.pattern).to_string(),
            other => other.to_string(),
        }
    }

    fn parse(&self, value: &str) -> Result<Value, ParseError> {
        NaiveDate::parse_from_str(value, &self.pattern)
            .map(Value::Date)
            .map_err(|e| ParseError::new(format!("|{value}| does not match |{}|: {e}", self.pattern)))
    }
}
