mod common;

use std::{fs, io::Write};

use common::{
    init_logger, person_descriptor, read_persons, Employee, ExceptionalFormat, NameFormat, Person,
};
use csv_binder::{
    core::item::ItemReader,
    error::CsvError,
    item::csv::{
        csv_descriptor::{ColumnNames, CsvDescriptor},
        csv_format::{CsvFormat, Delimiter, Escape, Quote},
        csv_reader::{CsvReader, CsvReaderBuilder},
    },
};
use tempfile::NamedTempFile;

const CONFORMANCE: &str = "\"John Doe\",\"Romania\"\r\n\"Baby Doe\",\"United Kingdom\"\r\n";

fn names(persons: &[Person]) -> Vec<Option<&str>> {
    persons.iter().map(|p| p.name.as_deref()).collect()
}

fn addresses(persons: &[Person]) -> Vec<Option<&str>> {
    persons.iter().map(|p| p.address.as_deref()).collect()
}

fn defaults(data: &str) -> Vec<Person> {
    read_persons(CsvFormat::default(), data.as_bytes())
}

#[test]
fn conformance() {
    let persons = defaults(CONFORMANCE);

    assert_eq!(persons.len(), 2);
    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);
    assert_eq!(addresses(&persons), vec![Some("Romania"), Some("United Kingdom")]);
}

#[test]
fn compatibility_with_common_csv() {
    init_logger();
    let data = "name,address\r\n\
                \"John Doe\",\"United States\"\r\n\
                Jane Doe,France\r\n\
                ,Germany\r\n\
                \"Baby Doe\",\r\n\
                \"John Doe, Sr.\",Romania\r\n\
                \"Lion, \"\"The Little Cat\"\"\",Russia\r\n";

    let format = CsvFormat::builder().header(true).build().unwrap();
    let persons = read_persons(format, data.as_bytes());

    assert_eq!(
        names(&persons),
        vec![
            Some("John Doe"),
            Some("Jane Doe"),
            Some(""),
            Some("Baby Doe"),
            Some("John Doe, Sr."),
            Some("Lion, \"The Little Cat\""),
        ]
    );
    assert_eq!(
        addresses(&persons),
        vec![
            Some("United States"),
            Some("France"),
            Some("Germany"),
            Some(""),
            Some("Romania"),
            Some("Russia"),
        ]
    );
}

#[test]
fn empty_stream() {
    assert!(defaults("").is_empty());
}

#[test]
fn next_on_empty_stream_is_exhausted() {
    let mut descriptor = person_descriptor(CsvFormat::default());
    let mut reader = CsvReader::new(&mut descriptor, "".as_bytes());

    assert!(!reader.has_next().unwrap());
    assert!(matches!(
        reader.next_record(),
        Err(CsvError::IterationExhausted)
    ));
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn line_terminators() {
    for data in [
        "John Doe,Romania\r\nBaby Doe,United Kingdom\r\n",
        "John Doe,Romania\nBaby Doe,United Kingdom\n",
        "John Doe,Romania\rBaby Doe,United Kingdom\r",
    ] {
        let persons = defaults(data);
        assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);
        assert_eq!(addresses(&persons), vec![Some("Romania"), Some("United Kingdom")]);
    }
}

#[test]
fn charsets() {
    let cases: [(&str, &[u8]); 3] = [
        (
            "UTF-8",
            "Ghi\u{163}\u{103} Mure\u{219}an,Rom\u{e2}nia\r\n".as_bytes(),
        ),
        ("Cp1250", b"Ghi\xFE\xE3 Mure\xBAan,Rom\xE2nia\r\n"),
        ("ISO-8859-2", b"Ghi\xFE\xE3 Mure\xBAan,Rom\xE2nia\r\n"),
    ];

    for (charset, data) in cases {
        let format = CsvFormat::builder().charset(charset).build().unwrap();
        let persons = read_persons(format, data);

        let expected_name = if charset == "UTF-8" {
            "Ghi\u{163}\u{103} Mure\u{219}an"
        } else {
            "Ghi\u{163}\u{103} Mure\u{15f}an"
        };
        assert_eq!(persons[0].name.as_deref(), Some(expected_name), "{charset}");
        assert_eq!(persons[0].address.as_deref(), Some("Rom\u{e2}nia"), "{charset}");
    }
}

#[test]
fn header_with_declared_columns_is_skipped() {
    let format = CsvFormat::builder().header(true).build().unwrap();
    let persons = read_persons(
        format,
        b"address,name\r\nJohn Doe,Romania\r\nBaby Doe,United Kingdom\r\n",
    );

    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);
}

#[test]
fn header_infers_columns() {
    init_logger();
    let format = CsvFormat::builder().header(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);

    let persons: Vec<Person> = CsvReaderBuilder::new(&mut descriptor)
        .from_reader("\r\naddress,name\r\nRomania,John Doe\r\n".as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(persons, vec![common::person("John Doe", "Romania")]);

    let columns: Vec<&str> = descriptor.columns().iter().map(|c| c.field_name()).collect();
    assert_eq!(columns, vec!["address", "name"]);
}

#[test]
fn header_on_empty_stream() {
    let format = CsvFormat::builder().header(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);
    let mut reader = CsvReader::new(&mut descriptor, "".as_bytes());

    assert!(!reader.has_next().unwrap());
}

#[test]
fn header_only_stream() {
    let format = CsvFormat::builder().header(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);

    {
        let mut reader = CsvReader::new(&mut descriptor, "name,address\r\n".as_bytes());
        assert!(!reader.has_next().unwrap());
    }
    assert_eq!(descriptor.columns().len(), 2);
}

#[test]
fn header_missing_field_strict() {
    let format = CsvFormat::builder().header(true).strict(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);
    let mut reader = CsvReader::new(
        &mut descriptor,
        "name,postal_address\r\nJohn Doe,Romania\r\n".as_bytes(),
    );

    match reader.has_next() {
        Err(CsvError::Binding { type_name, field }) => {
            assert_eq!(type_name, "Person");
            assert_eq!(field, "postal_address");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn header_disabled_reads_header_as_data() {
    let persons = defaults("name,address\r\nJohn Doe,Romania\r\n");

    assert_eq!(names(&persons), vec![Some("name"), Some("John Doe")]);
    assert_eq!(addresses(&persons), vec![Some("address"), Some("Romania")]);
}

#[test]
fn delimiters() {
    let data = b"John Doe\tRomania\r\nBaby Doe\tUnited Kingdom\r\n";

    let format = CsvFormat::builder().delimiter('\t').build().unwrap();
    let persons = read_persons(format, data);
    assert_eq!(addresses(&persons), vec![Some("Romania"), Some("United Kingdom")]);

    let format = CsvFormat::builder().delimiter(Delimiter::Tab).build().unwrap();
    let persons = read_persons(format, data);
    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);

    // wrong delimiter keeps each row in a single value
    let persons = read_persons(CsvFormat::default(), data);
    assert_eq!(
        names(&persons),
        vec![Some("John Doe\tRomania"), Some("Baby Doe\tUnited Kingdom")]
    );
    assert_eq!(addresses(&persons), vec![None, None]);
}

#[test]
fn empty_lines() {
    let data = b"\r\nJohn Doe,Romania\r\n\r\n\r\nBaby Doe,United Kingdom\r\n\r\n";

    let persons = read_persons(CsvFormat::default(), data);
    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);

    let format = CsvFormat::builder().empty_lines(true).build().unwrap();
    let persons = read_persons(format, data);
    assert_eq!(persons.len(), 6);
    assert_eq!(persons[0], Person::default());
    assert_eq!(persons[1].name.as_deref(), Some("John Doe"));
    assert_eq!(persons[4].name.as_deref(), Some("Baby Doe"));
    assert_eq!(persons[5], Person::default());
}

#[test]
fn comments() {
    let data = b"John Doe,Romania\r\n# comment #1\r\nBaby Doe,United Kingdom\r\n# comment #2";

    let persons = read_persons(CsvFormat::default(), data);
    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);

    let format = CsvFormat::builder().comment('\0').build().unwrap();
    let persons = read_persons(format, data);
    assert_eq!(
        names(&persons),
        vec![
            Some("John Doe"),
            Some("# comment #1"),
            Some("Baby Doe"),
            Some("# comment #2"),
        ]
    );
    assert_eq!(persons[1].address, None);
}

#[test]
fn comments_followed_by_empty_line() {
    let persons = defaults("# comment\r\n\r\nJohn Doe,Romania\r\nBaby Doe,United Kingdom\r\n");
    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);
}

#[test]
fn trim_on_tab_delimiter() {
    let format = CsvFormat::builder().delimiter(Delimiter::Tab).build().unwrap();
    let persons = read_persons(format, b"John Doe \t Romania \r\n Baby Doe\tUnited Kingdom\r\n");

    assert_eq!(names(&persons), vec![Some("John Doe"), Some("Baby Doe")]);
    assert_eq!(addresses(&persons), vec![Some("Romania"), Some("United Kingdom")]);
}

#[test]
fn complex_values() {
    let persons = defaults("\"John Doe\r\nJane Doe\",\"Jassy, \"\"RO\"\"\"\r\n");
    assert_eq!(persons[0].name.as_deref(), Some("John Doe\r\nJane Doe"));
    assert_eq!(persons[0].address.as_deref(), Some("Jassy, \"RO\""));

    let format = CsvFormat::builder().quote('\'').build().unwrap();
    let persons = read_persons(format, b"'John Doe','Jassy, RO'\r\n");
    assert_eq!(persons[0].address.as_deref(), Some("Jassy, RO"));
}

#[test]
fn complex_values_in_square_brackets() {
    let format = CsvFormat::builder()
        .quote_style(Quote::SquareBrackets)
        .escape(Escape::Backslash)
        .trim(false)
        .build()
        .unwrap();
    let persons = read_persons(format, b" [John Doe] ,[Jassy, \\] RO]\r\n");

    assert_eq!(persons[0].name.as_deref(), Some(" John Doe "));
    assert_eq!(persons[0].address.as_deref(), Some("Jassy, ] RO"));
}

#[test]
fn bad_quote_splits_on_delimiter() {
    let format = CsvFormat::builder().quote('!').build().unwrap();
    let persons = read_persons(format, b"\"John Doe\",\"Jassy, RO\"\r\n");

    assert_eq!(persons[0].name.as_deref(), Some("\"John Doe\""));
    assert_eq!(persons[0].address.as_deref(), Some("\"Jassy"));
}

#[test]
fn null_values() {
    let persons = defaults("NULL,Romania\r\nJohn Doe,null\r\n");
    assert_eq!(persons[0].name, None);
    assert_eq!(persons[1].address, None);

    let format = CsvFormat::builder().null_value("").build().unwrap();
    let persons = read_persons(format, b"John Doe,\r\n");
    assert_eq!(persons[0].address, None);
}

#[test]
fn value_formatter() {
    let mut descriptor = CsvDescriptor::<Person>::new();
    descriptor
        .column_with_formatter("name", NameFormat)
        .unwrap()
        .column("address")
        .unwrap();

    let mut reader = CsvReader::new(&mut descriptor, CONFORMANCE.as_bytes());
    let person = reader.next_record().unwrap();

    assert_eq!(person.name.as_deref(), Some("JOHN DOE"));
    assert_eq!(person.address.as_deref(), Some("Romania"));
}

#[test]
fn value_formatter_failure() {
    init_logger();

    let format = CsvFormat::builder().strict(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);
    descriptor
        .column_with_formatter("name", ExceptionalFormat)
        .unwrap()
        .column("address")
        .unwrap();
    let mut reader = CsvReader::new(&mut descriptor, CONFORMANCE.as_bytes());
    match reader.next_record() {
        Err(err @ CsvError::ValueFormat { .. }) => {
            assert!(err.to_string().contains("|Person#name|"));
            assert!(err.to_string().contains("exceptional value |John Doe|"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut descriptor = CsvDescriptor::<Person>::new();
    descriptor
        .column_with_formatter("name", ExceptionalFormat)
        .unwrap()
        .column("address")
        .unwrap();
    let mut reader = CsvReader::new(&mut descriptor, CONFORMANCE.as_bytes());
    let person = reader.next_record().unwrap();
    assert_eq!(person.name, None);
    assert_eq!(person.address.as_deref(), Some("Romania"));
}

#[test]
fn typed_fields() {
    let mut descriptor = CsvDescriptor::<Employee>::new();
    descriptor.add_columns(["name", "address", "wage"]).unwrap();

    let employees: Vec<Employee> = CsvReader::new(
        &mut descriptor,
        "John Doe,Romania,3500.0\r\nBaby Doe,United Kingdom,2000\r\n".as_bytes(),
    )
    .collect::<Result<_, _>>()
    .unwrap();

    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].wage, 3500.0);
    assert_eq!(employees[1].name.as_deref(), Some("Baby Doe"));
    assert_eq!(employees[1].wage, 2000.0);
}

#[test]
fn bad_value_type() {
    let data = "John Doe,Romania,Three thousand\r\n";

    let format = CsvFormat::builder().strict(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Employee>::with_format(format);
    descriptor.add_columns(["name", "address", "wage"]).unwrap();
    let mut reader = CsvReader::new(&mut descriptor, data.as_bytes());
    assert!(matches!(
        reader.next_record(),
        Err(CsvError::Conversion { field, .. }) if field == "wage"
    ));

    let mut descriptor = CsvDescriptor::<Employee>::new();
    descriptor.add_columns(["name", "address", "wage"]).unwrap();
    let mut reader = CsvReader::new(&mut descriptor, data.as_bytes());
    let employee = reader.next_record().unwrap();
    assert_eq!(employee.name.as_deref(), Some("John Doe"));
    assert_eq!(employee.address.as_deref(), Some("Romania"));
    assert_eq!(employee.wage, 0.0);
}

#[test]
fn missing_field() {
    let format = CsvFormat::builder().strict(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Person>::with_format(format);
    assert!(matches!(
        descriptor.add_columns(["name", "postal-address"]),
        Err(CsvError::Binding { .. })
    ));

    let mut descriptor = CsvDescriptor::<Person>::new();
    descriptor.add_columns(["name", "postalAddress"]).unwrap();
    let mut reader = CsvReader::new(&mut descriptor, CONFORMANCE.as_bytes());
    let person = reader.next_record().unwrap();
    assert_eq!(person.name.as_deref(), Some("John Doe"));
    assert_eq!(person.address, None);
}

#[test]
fn bad_columns_count() {
    let data = "John Doe,Romania,3500\r\n";

    let format = CsvFormat::builder().strict(true).build().unwrap();
    let mut descriptor = CsvDescriptor::<Employee>::with_format(format);
    descriptor.add_columns(["name", "address"]).unwrap();
    let mut reader = CsvReader::new(&mut descriptor, data.as_bytes());
    match reader.next_record() {
        Err(err) => assert_eq!(
            err.to_string(),
            "CSV values count |3| does not match columns count |2|"
        ),
        Ok(employee) => panic!("unexpected record: {employee:?}"),
    }

    let mut descriptor = CsvDescriptor::<Employee>::new();
    descriptor.add_columns(["name", "address"]).unwrap();
    let mut reader = CsvReader::new(&mut descriptor, data.as_bytes());
    let employee = reader.next_record().unwrap();
    assert_eq!(employee.address.as_deref(), Some("Romania"));
    assert_eq!(employee.wage, 0.0);
}

#[test]
fn columns_from_enumeration() {
    enum PersonColumns {}

    impl ColumnNames for PersonColumns {
        fn column_names() -> &'static [&'static str] {
            &["NAME", "ADDRESS"]
        }
    }

    let mut descriptor = CsvDescriptor::<Person>::new();
    descriptor.columns_from::<PersonColumns>().unwrap();
    let mut reader = CsvReader::new(&mut descriptor, CONFORMANCE.as_bytes());

    assert_eq!(
        reader.next_record().unwrap(),
        common::person("John Doe", "Romania")
    );
}

#[test]
fn read_from_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFORMANCE.as_bytes()).unwrap();
    file.flush().unwrap();

    let mut descriptor = person_descriptor(CsvFormat::default());
    let mut reader = CsvReaderBuilder::new(&mut descriptor)
        .from_path(file.path())
        .unwrap();

    let mut persons = Vec::new();
    while let Some(person) = reader.read().unwrap() {
        persons.push(person);
    }
    reader.close();

    assert_eq!(persons.len(), 2);
    assert_eq!(fs::read_to_string(file.path()).unwrap(), CONFORMANCE);
}

#[test]
fn read_from_missing_path() {
    let mut descriptor = person_descriptor(CsvFormat::default());
    let dir = tempfile::tempdir().unwrap();

    let result = CsvReaderBuilder::new(&mut descriptor).from_path(dir.path().join("missing.csv"));
    assert!(matches!(result, Err(CsvError::Io(_))));
}
