//! File ingestion: pick a table reader by extension and parse the market table.

use crate::adapters::csv_adapter::CsvTableReader;
use crate::adapters::xlsx_adapter::XlsxTableReader;
use crate::domain::error::CrudecastError;
use crate::domain::market::MarketTable;
use crate::ports::table_port::TableSource;
use std::fs;
use std::path::Path;

/// Extensions accepted by the upload form, in display order.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

pub fn table_source_for(file_name: &str) -> Result<Box<dyn TableSource>, CrudecastError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(Box::new(CsvTableReader)),
        Some("xlsx" | "xlsm" | "xls" | "ods") => Ok(Box::new(XlsxTableReader)),
        _ => Err(CrudecastError::UnsupportedFormat {
            file: file_name.to_string(),
        }),
    }
}

/// Parse uploaded bytes, using `file_name` only to choose the format.
pub fn load_market_table(file_name: &str, bytes: &[u8]) -> Result<MarketTable, CrudecastError> {
    let source = table_source_for(file_name)?;
    let raw = source.read_table(bytes)?;
    log::debug!(
        "read {} rows with headers {:?} from {}",
        raw.rows.len(),
        raw.headers,
        file_name
    );
    MarketTable::from_raw(&raw)
}

pub fn load_market_file(path: &Path) -> Result<MarketTable, CrudecastError> {
    let bytes = fs::read(path)?;
    load_market_table(&path.to_string_lossy(), &bytes)
}
