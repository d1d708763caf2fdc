use std::{fs::File, io::Read, path::Path};

use log::{debug, error, info, trace, warn};

use crate::{
    core::{
        convert::{Converter, DefaultConverter},
        item::{ItemReader, ItemReaderResult},
        record::Record,
    },
    error::CsvError,
    item::csv::{csv_descriptor::CsvDescriptor, tokenizer::Tokenizer},
};

/// A CSV reader binding rows to records of type `T`.
///
/// Rows are tokenized following the descriptor's [`CsvFormat`] and bound to
/// the descriptor columns by position. When the format declares a header
/// and no columns are declared yet, the first row fills the descriptor
/// columns and is not returned as a record.
///
/// Iteration is forward only and holds one row of lookahead:
/// [`has_next`](Self::has_next) tokenizes and buffers a row,
/// [`next_record`](Self::next_record) binds it. The reader is also an
/// [`Iterator`] over `Result<T, CsvError>` and an [`ItemReader`].
///
/// # Binding rules
///
/// - A value equal to the format null token (ignoring case) leaves the field
///   at its default.
/// - A column with a formatter parses the value with it, otherwise the
///   configured [`Converter`] converts it to the field type.
/// - Column count mismatch, missing field, formatter failure and conversion
///   failure are logged. In strict mode they fail the read; in relaxed mode
///   the shorter of values and columns is used and failing fields keep their
///   default.
///
/// Stream failures (I/O) are logged and reported as end of data; rows read
/// before stay valid.
///
/// # Examples
///
/// ```
/// use csv_binder::csv_record;
/// use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
/// use csv_binder::item::csv::csv_reader::CsvReaderBuilder;
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     address: String,
/// }
///
/// csv_record!(Person { name, address });
///
/// let data = "\"John Doe\",\"Romania\"\r\n\"Baby Doe\",\"United States\"\r\n";
///
/// let mut descriptor = CsvDescriptor::<Person>::new();
/// descriptor.add_columns(["name", "address"]).unwrap();
///
/// let mut reader = CsvReaderBuilder::new(&mut descriptor).from_reader(data.as_bytes());
///
/// let person = reader.next_record().unwrap();
/// assert_eq!(person.name, "John Doe");
/// assert_eq!(person.address, "Romania");
///
/// assert!(reader.has_next().unwrap());
/// let person = reader.next_record().unwrap();
/// assert_eq!(person.address, "United States");
///
/// assert!(!reader.has_next().unwrap());
/// ```
///
/// [`CsvFormat`]: crate::item::csv::csv_format::CsvFormat
pub struct CsvReader<'d, T, R> {
    descriptor: &'d mut CsvDescriptor<T>,
    converter: Box<dyn Converter>,
    tokenizer: Tokenizer<R>,
    /// Row tokenized by `has_next` and not yet consumed.
    values: Option<Vec<String>>,
    header_processed: bool,
    exhausted: bool,
}

impl<'d, T: Record, R: Read> CsvReader<'d, T, R> {
    /// Creates a reader with the default converter.
    pub fn new(descriptor: &'d mut CsvDescriptor<T>, rdr: R) -> Self {
        CsvReaderBuilder::new(descriptor).from_reader(rdr)
    }

    /// Tells whether another record is available, tokenizing one row ahead
    /// when needed. Calling it again without consuming the row is a no-op.
    ///
    /// # Errors
    ///
    /// In strict mode, a header naming a field missing from `T` fails with
    /// [`CsvError::Binding`].
    pub fn has_next(&mut self) -> Result<bool, CsvError> {
        if self.values.is_none() {
            self.values = self.parse_record()?;
        }
        Ok(self.values.is_some())
    }

    /// Consumes the next row and binds it to a new record.
    ///
    /// Works without a prior [`has_next`](Self::has_next) call. A row that
    /// fails to bind is consumed anyway, so the following call moves on.
    ///
    /// # Errors
    ///
    /// [`CsvError::IterationExhausted`] when no row is left, plus the strict
    /// mode binding errors.
    pub fn next_record(&mut self) -> Result<T, CsvError> {
        let values = match self.values.take() {
            Some(values) => values,
            None => self
                .parse_record()?
                .ok_or(CsvError::IterationExhausted)?,
        };
        self.bind(values)
    }

    /// The descriptor this reader binds with, including header-loaded columns.
    pub fn descriptor(&self) -> &CsvDescriptor<T> {
        self.descriptor
    }

    /// Releases the reader and returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.tokenizer.into_inner()
    }

    /// Releases the underlying stream.
    pub fn close(self) {
        trace!("Close CSV reader for |{}|.", T::type_name());
    }

    fn parse_record(&mut self) -> Result<Option<Vec<String>>, CsvError> {
        if self.exhausted {
            return Ok(None);
        }

        loop {
            let values = match self.tokenizer.next_row() {
                Ok(Some(values)) => values,
                Ok(None) => {
                    if self.descriptor.format().header() && !self.header_processed {
                        info!("Empty CSV stream for type |{}|.", T::type_name());
                    }
                    self.exhausted = true;
                    return Ok(None);
                }
                Err(err) => {
                    error!("CSV stream failure for |{}|: {}", T::type_name(), err);
                    self.exhausted = true;
                    return Ok(None);
                }
            };

            if self.descriptor.format().header() && !self.header_processed {
                if values.is_empty() {
                    continue;
                }
                self.header_processed = true;
                debug!("CSV header for |{}|: {:?}", T::type_name(), values);
                self.descriptor.load(&values)?;
                continue;
            }

            if !values.is_empty() || self.descriptor.format().empty_lines() {
                return Ok(Some(values));
            }
        }
    }

    fn bind(&self, values: Vec<String>) -> Result<T, CsvError> {
        let format = self.descriptor.format();
        let columns = self.descriptor.columns();
        let strict = format.strict();
        let mut record = T::default();

        // a blank row accepted by the format binds to the default record
        if values.is_empty() {
            return Ok(record);
        }

        if values.len() != columns.len() {
            let mismatch = CsvError::ColumnCountMismatch {
                values: values.len(),
                columns: columns.len(),
            };
            warn!("{mismatch}.");
            if strict {
                return Err(mismatch);
            }
        }

        for (column, value) in columns.iter().zip(values) {
            let field_name = column.field_name();

            let Some(field_type) = T::field_type(field_name) else {
                let missing = CsvError::Binding {
                    type_name: T::type_name(),
                    field: field_name.to_string(),
                };
                warn!("{missing}");
                if strict {
                    return Err(missing);
                }
                continue;
            };

            if is_null_token(&value, format.null_value()) {
                continue;
            }

            let field_value = match column.formatter() {
                Some(formatter) => match formatter.parse(&value) {
                    Ok(field_value) => field_value,
                    Err(err) => {
                        let failure = CsvError::ValueFormat {
                            type_name: T::type_name(),
                            field: field_name.to_string(),
                            message: err.to_string(),
                        };
                        error!("{failure}");
                        if strict {
                            return Err(failure);
                        }
                        continue;
                    }
                },
                None => match self.converter.as_value(&value, field_type) {
                    Ok(field_value) => field_value,
                    Err(err) => {
                        let failure = conversion_error::<T>(field_name, err.message());
                        error!("{failure}");
                        if strict {
                            return Err(failure);
                        }
                        continue;
                    }
                },
            };

            if let Err(err) = record.set_field(field_name, field_value) {
                let failure = conversion_error::<T>(field_name, err.message());
                error!("{failure}");
                if strict {
                    return Err(failure);
                }
            }
        }

        Ok(record)
    }
}

fn conversion_error<T: Record>(field_name: &str, message: &str) -> CsvError {
    CsvError::Conversion {
        type_name: T::type_name(),
        field: field_name.to_string(),
        message: message.to_string(),
    }
}

fn is_null_token(value: &str, null_value: &str) -> bool {
    value.eq_ignore_ascii_case(null_value) || value.to_lowercase() == null_value.to_lowercase()
}

impl<T: Record, R: Read> Iterator for CsvReader<'_, T, R> {
    type Item = Result<T, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_record()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<T: Record, R: Read> ItemReader<T> for CsvReader<'_, T, R> {
    /// Reads the next record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a record is successfully read
    /// - `Ok(None)` if there are no more records to read
    /// - `Err(error)` if a strict mode violation occurs
    fn read(&mut self) -> ItemReaderResult<T> {
        if self.has_next()? {
            self.next_record().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// A builder for [`CsvReader`].
///
/// # Examples
///
/// ```
/// use csv_binder::csv_record;
/// use csv_binder::core::item::ItemReader;
/// use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
/// use csv_binder::item::csv::csv_format::{CsvFormat, Delimiter};
/// use csv_binder::item::csv::csv_reader::CsvReaderBuilder;
///
/// #[derive(Debug, Default)]
/// struct City {
///     city: String,
///     pop: u32,
/// }
///
/// csv_record!(City { city, pop });
///
/// let format = CsvFormat::builder()
///     .delimiter(Delimiter::Semicolon)
///     .header(true)
///     .build()
///     .unwrap();
/// let mut descriptor = CsvDescriptor::<City>::with_format(format);
///
/// let mut reader = CsvReaderBuilder::new(&mut descriptor)
///     .from_reader("city;pop\nBoston;4628910\nConcord;42695".as_bytes());
///
/// let city = reader.read().unwrap().unwrap();
/// assert_eq!(city.city, "Boston");
/// assert_eq!(city.pop, 4628910);
/// ```
pub struct CsvReaderBuilder<'d, T> {
    descriptor: &'d mut CsvDescriptor<T>,
    converter: Box<dyn Converter>,
}

impl<'d, T: Record> CsvReaderBuilder<'d, T> {
    pub fn new(descriptor: &'d mut CsvDescriptor<T>) -> Self {
        Self {
            descriptor,
            converter: Box::new(DefaultConverter),
        }
    }

    /// Replaces the converter used for columns without formatter.
    pub fn converter<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Creates a reader over any byte source, decoded with the format charset.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvReader<'d, T, R> {
        trace!("Create CSV reader for |{}|.", T::type_name());
        let tokenizer = Tokenizer::new(rdr, self.descriptor.format());

        CsvReader {
            descriptor: self.descriptor,
            converter: self.converter,
            tokenizer,
            values: None,
            header_processed: false,
            exhausted: false,
        }
    }

    /// Creates a reader over a file.
    ///
    /// # Errors
    ///
    /// [`CsvError::Io`] when the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvReader<'d, T, File>, CsvError> {
        let file = File::open(path)?;
        Ok(self.from_reader(file))
    }
}
