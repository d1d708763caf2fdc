/// Text to value conversion used for columns without formatter.
pub mod convert;

/// Column formatters.
pub mod formatter;

pub mod item;

/// Field name normalization and matching.
pub mod names;

pub mod record;

pub mod value;
