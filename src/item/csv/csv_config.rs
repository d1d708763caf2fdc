//! Descriptor configuration loaded from structured data.
//!
//! A [`CsvDescriptorConfig`] carries the format attributes and the column list
//! of a descriptor. It is usually deserialized from JSON:
//!
//! ```json
//! {
//!   "type": "Person",
//!   "delimiter": ";",
//!   "header": false,
//!   "charset": "Cp1250",
//!   "columns": [
//!     { "field": "name", "format": "upper" },
//!     { "field": "address" }
//!   ]
//! }
//! ```
//!
//! Column formatters are named and resolved through a [`FormatterRegistry`].

use std::{collections::HashMap, fmt, sync::Arc};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    core::{formatter::Formatter, record::Record},
    error::CsvError,
    item::csv::{
        csv_descriptor::{CsvColumn, CsvDescriptor},
        csv_format::CsvFormat,
    },
};

/// Format attributes and columns of a descriptor. Absent attributes keep the
/// format defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvDescriptorConfig {
    /// Record type name, checked against the bound type when present.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    pub delimiter: Option<char>,
    pub comment: Option<char>,
    /// Shorthand for identical open and close quotes.
    pub quote: Option<char>,
    #[serde(alias = "open-quote")]
    pub open_quote: Option<char>,
    #[serde(alias = "close-quote")]
    pub close_quote: Option<char>,
    pub escape: Option<char>,
    pub header: Option<bool>,
    #[serde(alias = "empty-lines")]
    pub empty_lines: Option<bool>,
    pub trim: Option<bool>,
    pub charset: Option<String>,
    #[serde(alias = "null-value")]
    pub null_value: Option<String>,
    pub strict: Option<bool>,
    pub columns: Vec<CsvColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvColumnConfig {
    pub field: Option<String>,
    /// Formatter name, looked up in the [`FormatterRegistry`].
    pub format: Option<String>,
}

/// Named formatters available to descriptor configurations.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formatters.keys()).finish()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `formatter` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, formatter: F) -> &mut Self
    where
        F: Formatter + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(formatter));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(name).cloned()
    }
}

impl CsvDescriptorConfig {
    /// Builds the format described by these attributes.
    ///
    /// # Errors
    ///
    /// [`CsvError::Configuration`] on an open quote without close quote (or
    /// the reverse) and on an unknown charset.
    pub fn format(&self) -> Result<CsvFormat, CsvError> {
        let mut builder = CsvFormat::builder();

        if let Some(delimiter) = self.delimiter {
            builder = builder.delimiter(delimiter);
        }
        if let Some(comment) = self.comment {
            builder = builder.comment(comment);
        }
        if let Some(quote) = self.quote {
            builder = builder.quote(quote);
        }
        match (self.open_quote, self.close_quote) {
            (Some(open), Some(close)) => builder = builder.quote_pair(open, close),
            (Some(_), None) => {
                return Err(CsvError::Configuration(
                    "missing <close_quote> attribute".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(CsvError::Configuration(
                    "missing <open_quote> attribute".to_string(),
                ));
            }
            (None, None) => {}
        }
        if let Some(escape) = self.escape {
            builder = builder.escape(escape);
        }
        if let Some(header) = self.header {
            builder = builder.header(header);
        }
        if let Some(empty_lines) = self.empty_lines {
            builder = builder.empty_lines(empty_lines);
        }
        if let Some(trim) = self.trim {
            builder = builder.trim(trim);
        }
        if let Some(charset) = &self.charset {
            builder = builder.charset(charset.as_str());
        }
        if let Some(null_value) = &self.null_value {
            builder = builder.null_value(null_value.as_str());
        }
        if let Some(strict) = self.strict {
            builder = builder.strict(strict);
        }

        builder.build()
    }
}

impl<T: Record> CsvDescriptor<T> {
    /// Creates a descriptor from a configuration.
    ///
    /// # Errors
    ///
    /// [`CsvError::Configuration`] when the configured type does not match
    /// `T`, a column has no field name, a formatter name is not registered,
    /// or the format attributes are invalid. In strict mode a column naming
    /// a field missing from `T` fails with [`CsvError::Binding`].
    pub fn from_config(
        config: &CsvDescriptorConfig,
        registry: &FormatterRegistry,
    ) -> Result<Self, CsvError> {
        if let Some(record_type) = &config.record_type {
            if record_type != T::type_name() {
                return Err(CsvError::Configuration(format!(
                    "configured type |{record_type}| does not match descriptor type |{}|",
                    T::type_name()
                )));
            }
        }

        let mut descriptor = Self::with_format(config.format()?);

        for column in &config.columns {
            let field_name = column
                .field
                .as_deref()
                .filter(|field| !field.trim().is_empty())
                .ok_or_else(|| {
                    CsvError::Configuration("missing field name from column item".to_string())
                })?;

            let column = match &column.format {
                Some(name) => {
                    let formatter = registry.get(name).ok_or_else(|| {
                        CsvError::Configuration(format!("missing formatter |{name}|"))
                    })?;
                    CsvColumn::with_formatter(field_name, formatter)
                }
                None => CsvColumn::new(field_name),
            };
            descriptor.push(column)?;
        }

        debug!(
            "Configured |{}| columns for |{}|.",
            descriptor.columns().len(),
            T::type_name()
        );
        Ok(descriptor)
    }

    /// Creates a descriptor from a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`CsvError::Configuration`] on malformed JSON, plus the errors of
    /// [`from_config`](Self::from_config).
    pub fn from_json(json: &str, registry: &FormatterRegistry) -> Result<Self, CsvError> {
        let config: CsvDescriptorConfig = serde_json::from_str(json)
            .map_err(|err| CsvError::Configuration(err.to_string()))?;
        Self::from_config(&config, registry)
    }
}
