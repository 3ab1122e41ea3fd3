//! CSV adapter: reads market tables and writes the comparison export.

use crate::domain::comparison::{ComparisonTable, CSV_FILE_NAME};
use crate::domain::error::CrudecastError;
use crate::domain::pipeline::ForecastRun;
use crate::domain::raw_table::{Cell, RawTable};
use crate::ports::report_port::ReportPort;
use crate::ports::table_port::TableSource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct CsvTableReader;

impl TableSource for CsvTableReader {
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, CrudecastError> {
        // Spreadsheet tools often prepend a UTF-8 byte order mark.
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = rdr
            .headers()
            .map_err(|e| CrudecastError::Csv {
                reason: format!("invalid header row: {}", e),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CrudecastError::Csv {
                reason: format!("CSV parse error: {}", e),
            })?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(RawTable::new(headers, rows))
    }
}

/// Write failures are I/O or render errors, never input errors.
fn write_error(err: csv::Error) -> CrudecastError {
    let reason = format!("failed to write comparison: {}", err);
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => CrudecastError::Io(io_err),
        _ => CrudecastError::Render { reason },
    }
}

/// Serialize the comparison table with a header row and no index column.
pub fn write_comparison<W: io::Write>(
    table: &ComparisonTable,
    writer: W,
) -> Result<(), CrudecastError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ComparisonTable::headers())
        .map_err(write_error)?;
    for row in table.rows() {
        wtr.write_record(row.fields()).map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn comparison_to_string(table: &ComparisonTable) -> Result<String, CrudecastError> {
    let mut buf = Vec::new();
    write_comparison(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| CrudecastError::Render {
        reason: e.to_string(),
    })
}

/// Writes `brent_forecast_comparison.csv` into the output directory.
pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, run: &ForecastRun, output_dir: &Path) -> Result<PathBuf, CrudecastError> {
        let path = output_dir.join(CSV_FILE_NAME);
        let file = fs::File::create(&path)?;
        write_comparison(&run.comparison, io::BufWriter::new(file))?;
        log::debug!("wrote comparison CSV to {}", path.display());
        Ok(path)
    }
}
