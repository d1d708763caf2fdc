#![allow(dead_code)]

pub mod mocks;

pub use mocks::MockFile;

use csv_binder::{
    core::{
        formatter::{Formatter, ParseError},
        value::Value,
    },
    csv_record,
    item::csv::{csv_descriptor::CsvDescriptor, csv_format::CsvFormat},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: Option<String>,
    pub address: Option<String>,
}

csv_record!(Person { name, address });

pub fn person(name: &str, address: &str) -> Person {
    Person {
        name: Some(name.to_string()),
        address: Some(address.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employee {
    pub name: Option<String>,
    pub address: Option<String>,
    pub wage: f64,
}

csv_record!(Employee {
    name,
    address,
    wage
});

/// Upper cases names in both directions.
pub struct NameFormat;

impl Formatter for NameFormat {
    fn format(&self, value: &Value) -> String {
        value.to_string().to_uppercase()
    }

    fn parse(&self, value: &str) -> Result<Value, ParseError> {
        Ok(Value::from(value.to_uppercase()))
    }
}

/// Fails every parse.
pub struct ExceptionalFormat;

impl Formatter for ExceptionalFormat {
    fn format(&self, value: &Value) -> String {
        value.to_string()
    }

    fn parse(&self, value: &str) -> Result<Value, ParseError> {
        Err(ParseError::new(format!("exceptional value |{value}|")))
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Descriptor binding `name` and `address`, in this order.
pub fn person_descriptor(format: CsvFormat) -> CsvDescriptor<Person> {
    let mut descriptor = CsvDescriptor::with_format(format);
    descriptor
        .add_columns(["name", "address"])
        .expect("columns bind to Person");
    descriptor
}

pub fn read_persons(format: CsvFormat, data: &[u8]) -> Vec<Person> {
    let mut descriptor = person_descriptor(format);
    let reader = csv_binder::item::csv::csv_reader::CsvReader::new(&mut descriptor, data);
    reader
        .collect::<Result<Vec<_>, _>>()
        .expect("relaxed reading never fails")
}
