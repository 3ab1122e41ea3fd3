//! Tabular input port trait.

use crate::domain::error::CrudecastError;
use crate::domain::raw_table::RawTable;

/// Reads an uploaded file's bytes into header and data rows.
pub trait TableSource {
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, CrudecastError>;
}
