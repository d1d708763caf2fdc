//! Field access on record types.
//!
//! The CSV reader and writer never inspect record types themselves; they go
//! through [`Record`]. Most types get their implementation from
//! [`csv_record!`](crate::csv_record).

use crate::core::{
    convert::ConversionError,
    value::{FieldType, FieldValue, Value},
};

/// A type CSV rows bind to.
///
/// `Default` provides the blank instance every row starts from; fields not
/// set by a row keep their default value.
pub trait Record: Default {
    /// Name used in log and error messages.
    fn type_name() -> &'static str;

    /// Declared type of the named field, `None` when the type has no such field.
    fn field_type(name: &str) -> Option<FieldType>;

    /// Current value of the named field, `None` when the type has no such field.
    fn get_field(&self, name: &str) -> Option<Value>;

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ConversionError>;

    fn field_exists(name: &str) -> bool {
        Self::field_type(name).is_some()
    }
}

#[doc(hidden)]
pub fn field_type_of<R, F, A>(_accessor: A) -> FieldType
where
    F: FieldValue,
    A: Fn(&R) -> &F,
{
    F::FIELD_TYPE
}

/// Implements [`Record`] for a struct by listing the fields bound to CSV
/// columns.
///
/// Every listed field must implement [`FieldValue`]. Field lookup accepts the
/// identifier, its lowerCamelCase form and a case-insensitive spelling, see
/// [`field_matches`](crate::core::names::field_matches).
///
/// ```
/// use csv_binder::csv_record;
/// use csv_binder::core::record::Record;
/// use csv_binder::core::value::FieldType;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     postal_address: Option<String>,
///     age: u8,
/// }
///
/// csv_record!(Person { name, postal_address, age });
///
/// assert_eq!(Person::field_type("postalAddress"), Some(FieldType::Text));
/// assert_eq!(Person::field_type("AGE"), Some(FieldType::UInt));
/// assert!(!Person::field_exists("email"));
/// ```
#[macro_export]
macro_rules! csv_record {
    ($record:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::core::record::Record for $record {
            fn type_name() -> &'static str {
                stringify!($record)
            }

            fn field_type(name: &str) -> Option<$crate::core::value::FieldType> {
                $(
                    if $crate::core::names::field_matches(stringify!($field), name) {
                        return Some($crate::core::record::field_type_of(
                            |record: &$record| &record.$field,
                        ));
                    }
                )+
                None
            }

            fn get_field(&self, name: &str) -> Option<$crate::core::value::Value> {
                $(
                    if $crate::core::names::field_matches(stringify!($field), name) {
                        return Some($crate::core::value::FieldValue::to_value(&self.$field));
                    }
                )+
                None
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::core::value::Value,
            ) -> Result<(), $crate::core::convert::ConversionError> {
                $(
                    if $crate::core::names::field_matches(stringify!($field), name) {
                        self.$field = $crate::core::value::FieldValue::from_value(value)?;
                        return Ok(());
                    }
                )+
                Err($crate::core::convert::ConversionError::new(format!(
                    "no field |{}| on |{}|",
                    name,
                    stringify!($record)
                )))
            }
        }
    };
}
