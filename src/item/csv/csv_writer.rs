use std::{
    fs::File,
    io::{self, BufWriter, ErrorKind, Write},
    path::Path,
};

use encoding_rs::{UTF_16BE, UTF_16LE};
use log::{trace, warn};

use crate::{
    core::{
        convert::{Converter, DefaultConverter},
        item::{ItemWriter, ItemWriterResult},
        record::Record,
    },
    error::CsvError,
    item::csv::{
        csv_descriptor::{CsvColumn, CsvDescriptor},
        csv_format::CsvFormat,
    },
};

const EOL: &str = "\r\n";

/// A CSV writer serializing records of type `T`, one row per record.
///
/// For every descriptor column, in order, the field value is rendered with
/// the column formatter or, without one, with the configured [`Converter`].
/// Absent values are written as the format null token.
///
/// When the format has quotes and an escape character, every value is
/// enclosed in quotes and each escape or close quote character inside it is
/// preceded by the escape character. Otherwise values are written as is.
/// Rows always end with CRLF.
///
/// With a header format, the first write emits a row of the upper-cased
/// column field names.
///
/// Output is buffered; call [`flush`](ItemWriter::flush),
/// [`close`](ItemWriter::close) or [`into_inner`](Self::into_inner) to push it
/// to the destination.
pub struct CsvWriter<'d, T, W: Write> {
    descriptor: &'d CsvDescriptor<T>,
    converter: Box<dyn Converter>,
    /// `None` once closed.
    wtr: Option<BufWriter<W>>,
    header_written: bool,
}

impl<'d, T: Record, W: Write> CsvWriter<'d, T, W> {
    /// Creates a writer with the default converter.
    pub fn new(descriptor: &'d CsvDescriptor<T>, wtr: W) -> Self {
        CsvWriterBuilder::new(descriptor).from_writer(wtr)
    }

    /// Flushes buffered output and returns the destination.
    ///
    /// # Errors
    ///
    /// [`CsvError::Io`] when flushing fails or the writer was closed.
    pub fn into_inner(mut self) -> Result<W, CsvError> {
        let wtr = self.wtr.take().ok_or_else(closed)?;
        wtr.into_inner().map_err(|err| CsvError::Io(err.into_error()))
    }

    fn render(&self, record: &T) -> Result<String, CsvError> {
        let format = self.descriptor.format();
        let columns = self.descriptor.columns();

        if columns.is_empty() {
            return Err(CsvError::Configuration(format!(
                "no columns declared for |{}|",
                T::type_name()
            )));
        }

        let mut line = String::new();

        if format.header() && !self.header_written {
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    line.push(format.delimiter());
                }
                push_value(format, &mut line, &column.field_name().to_uppercase());
            }
            line.push_str(EOL);
        }

        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                line.push(format.delimiter());
            }
            let text = self.column_text(record, column)?;
            push_value(format, &mut line, &text);
        }
        line.push_str(EOL);

        Ok(line)
    }

    fn column_text(&self, record: &T, column: &CsvColumn) -> Result<String, CsvError> {
        let format = self.descriptor.format();

        let Some(value) = record.get_field(column.field_name()) else {
            let missing = CsvError::Binding {
                type_name: T::type_name(),
                field: column.field_name().to_string(),
            };
            warn!("{missing}");
            if format.strict() {
                return Err(missing);
            }
            return Ok(format.null_value().to_string());
        };

        if value.is_null() {
            return Ok(format.null_value().to_string());
        }

        Ok(match column.formatter() {
            Some(formatter) => formatter.format(&value),
            None => self.converter.as_string(&value),
        })
    }

    fn emit(&mut self, line: &str) -> Result<(), CsvError> {
        let charset = self.descriptor.format().charset();
        let wtr = self.wtr.as_mut().ok_or_else(closed)?;

        // encoding_rs only encodes into ASCII-compatible charsets
        if charset == UTF_16LE || charset == UTF_16BE {
            wtr.write_all(&encode_utf16(line, charset == UTF_16BE))?;
            return Ok(());
        }

        let (bytes, _, unmappable) = charset.encode(line);
        if unmappable {
            warn!(
                "Characters not representable in |{}| written as numeric references.",
                charset.name()
            );
        }
        wtr.write_all(&bytes)?;
        Ok(())
    }
}

fn encode_utf16(line: &str, big_endian: bool) -> Vec<u8> {
    line.encode_utf16()
        .flat_map(|unit| {
            if big_endian {
                unit.to_be_bytes()
            } else {
                unit.to_le_bytes()
            }
        })
        .collect()
}

fn closed() -> CsvError {
    CsvError::Io(io::Error::new(ErrorKind::NotConnected, "CSV writer closed"))
}

fn push_value(format: &CsvFormat, line: &mut String, value: &str) {
    let (Some(open), Some(close), Some(escape)) =
        (format.open_quote(), format.close_quote(), format.escape())
    else {
        line.push_str(value);
        return;
    };

    line.push(open);
    for c in value.chars() {
        if c == escape || c == close {
            line.push(escape);
        }
        line.push(c);
    }
    line.push(close);
}

impl<T: Record, W: Write> ItemWriter<T> for CsvWriter<'_, T, W> {
    fn write(&mut self, item: &T) -> ItemWriterResult {
        let line = self.render(item)?;
        self.emit(&line)?;
        self.header_written = true;
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&mut self) -> ItemWriterResult {
        let wtr = self.wtr.as_mut().ok_or_else(closed)?;
        wtr.flush()?;
        Ok(())
    }

    /// Flushes and drops the destination. Later writes fail.
    fn close(&mut self) -> ItemWriterResult {
        let Some(mut wtr) = self.wtr.take() else {
            return Ok(());
        };
        trace!("Close CSV writer for |{}|.", T::type_name());
        wtr.flush()?;
        Ok(())
    }
}

/// A builder for [`CsvWriter`].
///
/// # Examples
///
/// ```
/// use csv_binder::csv_record;
/// use csv_binder::core::item::ItemWriter;
/// use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
/// use csv_binder::item::csv::csv_format::CsvFormat;
/// use csv_binder::item::csv::csv_writer::CsvWriterBuilder;
///
/// #[derive(Debug, Default)]
/// struct City {
///     city: String,
///     pop: u32,
/// }
///
/// csv_record!(City { city, pop });
///
/// let format = CsvFormat::builder().header(true).build().unwrap();
/// let mut descriptor = CsvDescriptor::<City>::with_format(format);
/// descriptor.add_columns(["city", "pop"]).unwrap();
///
/// let mut wtr = CsvWriterBuilder::new(&descriptor).from_writer(vec![]);
/// wtr.write(&City { city: "Boston".to_string(), pop: 4628910 }).unwrap();
/// wtr.write(&City { city: "Concord".to_string(), pop: 42695 }).unwrap();
///
/// let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
/// assert_eq!(
///     data,
///     "\"CITY\",\"POP\"\r\n\"Boston\",\"4628910\"\r\n\"Concord\",\"42695\"\r\n"
/// );
/// ```
pub struct CsvWriterBuilder<'d, T> {
    descriptor: &'d CsvDescriptor<T>,
    converter: Box<dyn Converter>,
}

impl<'d, T: Record> CsvWriterBuilder<'d, T> {
    pub fn new(descriptor: &'d CsvDescriptor<T>) -> Self {
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

    pub fn from_writer<W: Write>(self, wtr: W) -> CsvWriter<'d, T, W> {
        trace!("Create CSV writer for |{}|.", T::type_name());
        CsvWriter {
            descriptor: self.descriptor,
            converter: self.converter,
            wtr: Some(BufWriter::new(wtr)),
            header_written: false,
        }
    }

    /// Creates a writer over a file, truncating it.
    ///
    /// # Errors
    ///
    /// [`CsvError::Io`] when the file cannot be created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvWriter<'d, T, File>, CsvError> {
        let file = File::create(path)?;
        Ok(self.from_writer(file))
    }
}
