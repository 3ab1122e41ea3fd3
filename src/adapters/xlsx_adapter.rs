//! Spreadsheet adapter: reads the first worksheet of an .xlsx/.xls/.ods file.

use crate::domain::error::CrudecastError;
use crate::domain::raw_table::{Cell, RawTable};
use crate::ports::table_port::TableSource;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

pub struct XlsxTableReader;

impl TableSource for XlsxTableReader {
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, CrudecastError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
            CrudecastError::Spreadsheet {
                reason: e.to_string(),
            }
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CrudecastError::Spreadsheet {
                reason: "workbook has no worksheets".into(),
            })?
            .map_err(|e| CrudecastError::Spreadsheet {
                reason: e.to_string(),
            })?;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| convert(c).to_string())
                .collect(),
            None => Vec::new(),
        };
        let rows = rows
            .map(|row| row.iter().map(convert).collect::<Vec<Cell>>())
            .collect();

        Ok(RawTable::new(headers, rows))
    }
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::from_text(s),
        other => Cell::Text(other.to_string()),
    }
}
