//! Generic conversion between CSV text and typed [`Value`]s.
//!
//! Columns without a formatter are converted through a [`Converter`]. The
//! reader and writer use [`DefaultConverter`] unless their builders are given
//! another one.

#[cfg(feature = "chrono")]
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::core::value::{FieldType, Value};

/// Failure to turn a string into a value of the requested type, or to assign
/// a value to a field.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// String to value conversion, and back, for a declared field type.
pub trait Converter {
    fn as_value(&self, value: &str, field_type: FieldType) -> Result<Value, ConversionError>;

    fn as_string(&self, value: &Value) -> String;
}

#[cfg(feature = "chrono")]
const DATETIME_PATTERNS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Converter used when none is configured.
///
/// Booleans accept `true/false`, `yes/no` and `1/0` regardless of case.
/// Dates use ISO-8601 (`2024-03-01`, `2024-03-01T10:20:30`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn as_value(&self, value: &str, field_type: FieldType) -> Result<Value, ConversionError> {
        let invalid = |reason: &dyn std::fmt::Display| {
            ConversionError::new(format!(
                "cannot convert |{value}| to {field_type}: {reason}"
            ))
        };

        match field_type {
            FieldType::Text => Ok(Value::Text(value.to_string())),
            FieldType::Bool => match value.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid(&"not a boolean")),
            },
            FieldType::Int => value
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| invalid(&e)),
            FieldType::UInt => value
                .parse::<u64>()
                .map(Value::UInt)
                .map_err(|e| invalid(&e)),
            FieldType::Float => value
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| invalid(&e)),
            FieldType::Char => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(invalid(&"expected exactly one character")),
                }
            }
            #[cfg(feature = "chrono")]
            FieldType::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|e| invalid(&e)),
            #[cfg(feature = "chrono")]
            FieldType::DateTime => DATETIME_PATTERNS
                .iter()
                .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
                .map(Value::DateTime)
                .ok_or_else(|| invalid(&"not an ISO-8601 datetime")),
        }
    }

    fn as_string(&self, value: &Value) -> String {
        value.to_string()
    }
}
