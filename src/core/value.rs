//! Dynamic values exchanged between CSV columns and record fields.
//!
//! A [`Value`] is what a [`Formatter`](crate::core::formatter::Formatter) or a
//! [`Converter`](crate::core::convert::Converter) produces from a CSV token,
//! and what a [`Record`](crate::core::record::Record) hands out for writing.
//! [`FieldType`] is the declared type of a record field, used to pick the
//! conversion target.

use std::fmt::{self, Display};

#[cfg(feature = "chrono")]
use chrono::{NaiveDate, NaiveDateTime};

use crate::core::convert::ConversionError;

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Text,
    #[cfg(feature = "chrono")]
    Date,
    #[cfg(feature = "chrono")]
    DateTime,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::Int => "signed integer",
            FieldType::UInt => "unsigned integer",
            FieldType::Float => "float",
            FieldType::Char => "char",
            FieldType::Text => "text",
            #[cfg(feature = "chrono")]
            FieldType::Date => "date",
            #[cfg(feature = "chrono")]
            FieldType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A single field value. `Null` marks an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    #[cfg(feature = "chrono")]
    Date(NaiveDate),
    #[cfg(feature = "chrono")]
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "signed integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Text(_) => "text",
            #[cfg(feature = "chrono")]
            Value::Date(_) => "date",
            #[cfg(feature = "chrono")]
            Value::DateTime(_) => "datetime",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            #[cfg(feature = "chrono")]
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            #[cfg(feature = "chrono")]
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Conversion between a Rust field type and [`Value`].
///
/// Implemented for the primitive types a CSV column usually maps to.
/// `Option<T>` maps `None` to [`Value::Null`] and back.
pub trait FieldValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

fn mismatch<T>(value: &Value, target: FieldType) -> Result<T, ConversionError> {
    Err(ConversionError::new(format!(
        "{} value |{}| is not assignable to {} field",
        value.kind(),
        value,
        target
    )))
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v),
            Value::Char(c) => Ok(c.to_string()),
            other => mismatch(&other, Self::FIELD_TYPE),
        }
    }
}

impl FieldValue for char {
    const FIELD_TYPE: FieldType = FieldType::Char;

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Char(c) => Ok(c),
            other => mismatch(&other, Self::FIELD_TYPE),
        }
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch(&other, Self::FIELD_TYPE),
        }
    }
}

macro_rules! impl_integer_field {
    ($field_type:expr, $variant:ident, $wide:ty, $($t:ty),+) => {
        $(
            impl FieldValue for $t {
                const FIELD_TYPE: FieldType = $field_type;

                fn to_value(&self) -> Value {
                    Value::$variant(<$wide>::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    let converted = match value {
                        Value::Int(v) => <$t>::try_from(v).ok(),
                        Value::UInt(v) => <$t>::try_from(v).ok(),
                        other => return mismatch(&other, Self::FIELD_TYPE),
                    };
                    converted.ok_or_else(|| {
                        ConversionError::new(format!(
                            "value out of range for {}",
                            stringify!($t)
                        ))
                    })
                }
            }
        )+
    };
}

impl_integer_field!(FieldType::Int, Int, i64, i8, i16, i32, i64);
impl_integer_field!(FieldType::UInt, UInt, u64, u8, u16, u32, u64);

macro_rules! impl_float_field {
    ($($t:ty),+) => {
        $(
            impl FieldValue for $t {
                const FIELD_TYPE: FieldType = FieldType::Float;

                fn to_value(&self) -> Value {
                    Value::Float(f64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Float(v) => Ok(v as $t),
                        Value::Int(v) => Ok(v as $t),
                        Value::UInt(v) => Ok(v as $t),
                        other => mismatch(&other, Self::FIELD_TYPE),
                    }
                }
            }
        )+
    };
}

impl_float_field!(f32, f64);

#[cfg(feature = "chrono")]
impl FieldValue for NaiveDate {
    const FIELD_TYPE: FieldType = FieldType::Date;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Date(d) => Ok(d),
            Value::DateTime(dt) => Ok(dt.date()),
            other => mismatch(&other, Self::FIELD_TYPE),
        }
    }
}

#[cfg(feature = "chrono")]
impl FieldValue for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => mismatch(&other, Self::FIELD_TYPE),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
