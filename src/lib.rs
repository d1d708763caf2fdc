#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # CSV Binder

 A configurable CSV reader and writer that binds rows to typed records.

 A CSV "contract" is described once, by a [`CsvFormat`](item::csv::csv_format::CsvFormat)
 and a [`CsvDescriptor`](item::csv::csv_descriptor::CsvDescriptor), and then used
 to read rows into record instances or to write record instances as rows.

 ## Core Concepts

- **Format:** delimiter, quote pair, escape character, comment marker, header
  flag, blank line policy, trimming, charset, null token and strict mode.
- **Descriptor:** a format plus the ordered list of columns, each bound to a
  record field and optionally to a formatter.
- **Record:** any `Default` struct implementing [`Record`](core::record::Record),
  usually through the [`csv_record!`] macro.
- **Reader:** tokenizes the character stream and binds each row to a new record.
- **Writer:** the inverse, escaping values and ending rows with CRLF.

 ## Features

| **Feature**   | **Description**                                                  |
|---------------|------------------------------------------------------------------|
| chrono        | Date and datetime fields, `DateFormatter` (enabled by default)   |
| full          | Enables all available features                                   |

 ## Getting Started

```toml
[dependencies]
csv-binder = "<version>"
```

Then, on your main.rs:

```rust
use csv_binder::{
    core::item::{ItemReader, ItemWriter},
    csv_record,
    error::CsvError,
    item::csv::{
        csv_descriptor::CsvDescriptor,
        csv_format::{CsvFormat, Delimiter},
        csv_reader::CsvReaderBuilder,
        csv_writer::CsvWriterBuilder,
    },
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
    description: Option<String>,
}

csv_record!(Car { year, make, model, description });

fn main() -> Result<(), CsvError> {
    let csv = "year;make;model;description
   1948;Porsche;356;Luxury sports car
   1995;Peugeot;205;NULL
   2021;Mazda;CX-30;\"SUV; Compact\"";

    let format = CsvFormat::builder()
        .delimiter(Delimiter::Semicolon)
        .header(true)
        .build()?;
    let mut descriptor = CsvDescriptor::<Car>::with_format(format);

    let mut reader = CsvReaderBuilder::new(&mut descriptor).from_reader(csv.as_bytes());
    let mut cars = Vec::new();
    while let Some(car) = reader.read()? {
        cars.push(car);
    }

    assert_eq!(cars.len(), 3);
    assert_eq!(cars[1].description, None);
    assert_eq!(cars[2].description.as_deref(), Some("SUV; Compact"));

    let mut writer = CsvWriterBuilder::new(&descriptor).from_writer(Vec::new());
    writer.write_items(&cars)?;
    writer.flush()?;

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Record binding, values, conversion and item traits
pub mod core;

/// Error types for CSV operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// CSV reader, writer and their configuration
pub mod item;
