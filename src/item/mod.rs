/// This module provides a configurable CSV reader and writer binding rows to records.
pub mod csv;
