//! CSV support for binding delimited text to typed records.
//!
//! This module reads CSV rows into record instances and writes record instances
//! back as CSV rows, both driven by the same descriptor.
//!
//! # Module Architecture
//!
//! 1. **CsvFormat**: the shared parameters (delimiter, quotes, escape, comment
//!    marker, header, blank line policy, trimming, charset, null token, strict
//!    mode).
//!
//! 2. **CsvDescriptor**: a format plus the ordered columns, each bound to a
//!    record field and optionally to a [`Formatter`](crate::core::formatter::Formatter).
//!    Columns are declared explicitly, listed by an enumeration, loaded from a
//!    configuration or inferred from the header row.
//!
//! 3. **CsvReader**: a character level tokenizer feeding a binder. It
//!    implements `Iterator` and `ItemReader`.
//!
//! 4. **CsvWriter**: the inverse, escaping every value and ending rows with
//!    CRLF. It implements `ItemWriter`.
//!
//! Reader and writer follow the builder pattern and borrow the descriptor for
//! as long as they live. The reader borrows it mutably since header inference
//! stores the inferred columns back.
//!
//! # Strict and relaxed mode
//!
//! Binding problems (column count mismatch, missing field, value that cannot
//! be parsed) are always logged. In strict mode they are also returned as
//! errors; in relaxed mode the affected fields keep their default value.
//!
//! # Examples
//!
//! ## Reading with a header
//!
//! ```
//! use csv_binder::csv_record;
//! use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
//! use csv_binder::item::csv::csv_format::CsvFormat;
//! use csv_binder::item::csv::csv_reader::CsvReaderBuilder;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct City {
//!     city: String,
//!     country: String,
//!     pop: u32,
//! }
//!
//! csv_record!(City { city, country, pop });
//!
//! let csv_data = "\
//! ## population estimates
//! city,country,pop
//! Boston,United States,4628910
//! Concord,United States,42695
//! ";
//!
//! let format = CsvFormat::builder().header(true).build().unwrap();
//! let mut descriptor = CsvDescriptor::<City>::with_format(format);
//!
//! let cities: Vec<City> = CsvReaderBuilder::new(&mut descriptor)
//!     .from_reader(csv_data.as_bytes())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(cities.len(), 2);
//! assert_eq!(cities[0].city, "Boston");
//! assert_eq!(cities[1].pop, 42695);
//!
//! // header columns are kept by the descriptor
//! assert_eq!(descriptor.columns().len(), 3);
//! ```
//!
//! ## Writing
//!
//! ```
//! use csv_binder::csv_record;
//! use csv_binder::core::item::ItemWriter;
//! use csv_binder::item::csv::csv_descriptor::CsvDescriptor;
//! use csv_binder::item::csv::csv_writer::CsvWriterBuilder;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     address: Option<String>,
//! }
//!
//! csv_record!(Person { name, address });
//!
//! let mut descriptor = CsvDescriptor::<Person>::new();
//! descriptor.add_columns(["name", "address"]).unwrap();
//!
//! let mut writer = CsvWriterBuilder::new(&descriptor).from_writer(Vec::new());
//! writer
//!     .write(&Person {
//!         name: "John Doe".to_string(),
//!         address: Some("Romania, \"Jassy\"".to_string()),
//!     })
//!     .unwrap();
//! writer
//!     .write(&Person {
//!         name: "Baby Doe".to_string(),
//!         address: None,
//!     })
//!     .unwrap();
//!
//! let csv_output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(
//!     csv_output,
//!     "\"John Doe\",\"Romania, \"\"Jassy\"\"\"\r\n\"Baby Doe\",\"NULL\"\r\n"
//! );
//! ```

/// Decoding of the byte stream into characters.
mod char_stream;

/// Descriptor configuration from structured data.
pub mod csv_config;

pub mod csv_descriptor;

/// Format parameters and presets.
pub mod csv_format;

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

mod tokenizer;
