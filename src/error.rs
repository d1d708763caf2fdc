use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by CSV descriptors, readers and writers.
pub enum CsvError {
    #[error("Invalid CSV configuration: {0}")]
    Configuration(String),

    #[error("Missing field |{type_name}#{field}|")]
    Binding {
        type_name: &'static str,
        field: String,
    },

    #[error("CSV values count |{values}| does not match columns count |{columns}|")]
    ColumnCountMismatch { values: usize, columns: usize },

    #[error("Could not set field value |{type_name}#{field}|. Root cause: {message}")]
    ValueFormat {
        type_name: &'static str,
        field: String,
        message: String,
    },

    #[error("Could not convert field value |{type_name}#{field}|. Root cause: {message}")]
    Conversion {
        type_name: &'static str,
        field: String,
        message: String,
    },

    #[error("No more CSV records")]
    IterationExhausted,

    #[error("CSV stream: {0}")]
    Io(#[from] std::io::Error),
}
