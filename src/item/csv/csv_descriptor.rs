use std::{fmt, marker::PhantomData, sync::Arc};

use log::{debug, warn};

use crate::{
    core::{
        formatter::Formatter,
        names::{infer_field_names, to_member_name},
        record::Record,
    },
    error::CsvError,
    item::csv::csv_format::CsvFormat,
};

/// Binds one CSV column, by position, to a record field.
#[derive(Clone)]
pub struct CsvColumn {
    field_name: String,
    formatter: Option<Arc<dyn Formatter>>,
}

impl CsvColumn {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            formatter: None,
        }
    }

    pub fn with_formatter(field_name: impl Into<String>, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            field_name: field_name.into(),
            formatter: Some(formatter),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn formatter(&self) -> Option<&dyn Formatter> {
        self.formatter.as_deref()
    }
}

impl fmt::Debug for CsvColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvColumn")
            .field("field_name", &self.field_name)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// An enumeration whose variants name the CSV columns, in order.
///
/// Variant names are converted with
/// [`to_member_name`](crate::core::names::to_member_name), so
/// `POSTAL_ADDRESS` binds to the `postalAddress` (or `postal_address`) field.
pub trait ColumnNames {
    fn column_names() -> &'static [&'static str];
}

/// Describes how CSV rows map onto records of type `T`.
///
/// A descriptor couples a [`CsvFormat`] with the ordered list of columns.
/// Columns are declared explicitly or, when the format has a header and none
/// were declared, loaded from the first row by the reader.
///
/// In strict mode every column added is checked against `T` and a missing
/// field is reported as [`CsvError::Binding`]. In relaxed mode the check is
/// left to the reader.
///
/// # Examples
///
/// ```
/// use csv_binder::csv_record;
/// use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     address: String,
/// }
///
/// csv_record!(Person { name, address });
///
/// let mut descriptor = CsvDescriptor::<Person>::new();
/// descriptor.add_columns(["name", "address"]).unwrap();
///
/// assert_eq!(descriptor.columns().len(), 2);
/// assert_eq!(descriptor.columns()[1].field_name(), "address");
/// ```
pub struct CsvDescriptor<T> {
    format: CsvFormat,
    columns: Vec<CsvColumn>,
    record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for CsvDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvDescriptor")
            .field("format", &self.format)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<T> Clone for CsvDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            format: self.format.clone(),
            columns: self.columns.clone(),
            record: PhantomData,
        }
    }
}

impl<T: Record> Default for CsvDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> CsvDescriptor<T> {
    /// Creates a descriptor with the default format and no columns.
    pub fn new() -> Self {
        Self::with_format(CsvFormat::default())
    }

    pub fn with_format(format: CsvFormat) -> Self {
        Self {
            format,
            columns: Vec::new(),
            record: PhantomData,
        }
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    pub fn format_mut(&mut self) -> &mut CsvFormat {
        &mut self.format
    }

    pub fn type_name(&self) -> &'static str {
        T::type_name()
    }

    pub fn columns(&self) -> &[CsvColumn] {
        &self.columns
    }

    /// Appends a column without formatter.
    pub fn column(&mut self, field_name: &str) -> Result<&mut Self, CsvError> {
        self.push(CsvColumn::new(field_name))
    }

    /// Appends a column whose values go through `formatter`.
    pub fn column_with_formatter<F>(
        &mut self,
        field_name: &str,
        formatter: F,
    ) -> Result<&mut Self, CsvError>
    where
        F: Formatter + 'static,
    {
        self.push(CsvColumn::with_formatter(field_name, Arc::new(formatter)))
    }

    /// Appends one column per field name, in order.
    pub fn add_columns<I, S>(&mut self, field_names: I) -> Result<&mut Self, CsvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field_name in field_names {
            self.column(field_name.as_ref())?;
        }
        Ok(self)
    }

    /// Appends one column per variant of `E`.
    pub fn columns_from<E: ColumnNames>(&mut self) -> Result<&mut Self, CsvError> {
        for name in E::column_names() {
            self.push(CsvColumn::new(to_member_name(name)))?;
        }
        Ok(self)
    }

    /// Loads columns from a header row.
    ///
    /// Does nothing when columns are already declared.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CsvError::Binding`] for the first header
    /// token that does not resolve to a field of `T`.
    pub fn load(&mut self, header: &[String]) -> Result<(), CsvError> {
        if !self.columns.is_empty() {
            debug!(
                "Columns already declared for |{}|. Ignore CSV header.",
                T::type_name()
            );
            return Ok(());
        }

        for field_name in infer_field_names(header) {
            self.push(CsvColumn::new(field_name))?;
        }
        debug!(
            "Loaded |{}| columns from CSV header for |{}|.",
            self.columns.len(),
            T::type_name()
        );
        Ok(())
    }

    pub(crate) fn push(&mut self, column: CsvColumn) -> Result<&mut Self, CsvError> {
        if self.format.strict() && !T::field_exists(column.field_name()) {
            warn!(
                "Missing field |{}#{}|",
                T::type_name(),
                column.field_name()
            );
            return Err(CsvError::Binding {
                type_name: T::type_name(),
                field: column.field_name.clone(),
            });
        }
        self.columns.push(column);
        Ok(self)
    }
}
