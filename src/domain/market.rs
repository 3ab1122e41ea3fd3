//! Historical yearly market table: Year plus price, demand and supply.

use super::error::CrudecastError;
use super::metric::{Metric, YEAR_COLUMN};
use super::raw_table::{Cell, RawTable};
use super::series::TimeSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub year: i32,
    /// January 1st of `year`.
    pub date: NaiveDate,
    pub avg_price: Option<f64>,
    pub global_demand: Option<f64>,
    pub global_supply: Option<f64>,
}

impl MarketRecord {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AvgPrice => self.avg_price,
            Metric::GlobalDemand => self.global_demand,
            Metric::GlobalSupply => self.global_supply,
        }
    }
}

/// Records in file order. Years are neither deduplicated nor sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketTable {
    records: Vec<MarketRecord>,
}

impl MarketTable {
    pub fn new(records: Vec<MarketRecord>) -> Result<Self, CrudecastError> {
        if records.is_empty() {
            return Err(CrudecastError::EmptyTable);
        }
        Ok(Self { records })
    }

    /// Resolve required columns by header and parse every data row.
    pub fn from_raw(raw: &RawTable) -> Result<Self, CrudecastError> {
        let missing: Vec<String> = std::iter::once(YEAR_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column()))
            .filter(|name| raw.column_index(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(CrudecastError::MissingColumns { columns: missing });
        }

        // All present, checked above.
        let index = |name: &str| raw.column_index(name).unwrap_or_default();
        let year_idx = index(YEAR_COLUMN);
        let metric_idx: Vec<(Metric, usize)> = Metric::ALL
            .iter()
            .map(|&m| (m, index(m.column())))
            .collect();

        let mut records = Vec::with_capacity(raw.rows.len());
        for (i, row) in raw.rows.iter().enumerate() {
            if row.iter().all(Cell::is_empty) {
                continue;
            }
            let row_number = i + 1;
            let empty = Cell::Empty;
            let cell = |idx: usize| row.get(idx).unwrap_or(&empty);

            let year = parse_year(cell(year_idx), row_number)?;
            let date = year_to_date(year).ok_or_else(|| CrudecastError::InvalidYear {
                row: row_number,
                value: year.to_string(),
            })?;

            let mut values = [None; 3];
            for (slot, &(metric, idx)) in values.iter_mut().zip(&metric_idx) {
                *slot = parse_value(cell(idx), metric, row_number)?;
            }

            records.push(MarketRecord {
                year,
                date,
                avg_price: values[0],
                global_demand: values[1],
                global_supply: values[2],
            });
        }

        log::debug!("parsed {} market records", records.len());
        Self::new(records)
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct history dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    pub fn year_span(&self) -> Option<(i32, i32)> {
        let first = self.records.iter().map(|r| r.year).min()?;
        let last = self.records.iter().map(|r| r.year).max()?;
        Some((first, last))
    }

    /// Two-column (date, value) series for one metric, skipping missing values.
    pub fn series(&self, metric: Metric) -> TimeSeries {
        let points = self
            .records
            .iter()
            .filter_map(|r| r.value(metric).map(|v| (r.date, v)))
            .collect();
        TimeSeries::new(metric, points)
    }
}

/// January 1st of `year`, if representable.
pub fn year_to_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn parse_year(cell: &Cell, row: usize) -> Result<i32, CrudecastError> {
    let invalid = || CrudecastError::InvalidYear {
        row,
        value: cell.to_string(),
    };
    let whole = |v: f64| {
        if v.is_finite() && v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
            Some(v as i32)
        } else {
            None
        }
    };
    match cell {
        Cell::Int(i) => i32::try_from(*i).map_err(|_| invalid()),
        Cell::Float(v) => whole(*v).ok_or_else(invalid),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .ok_or_else(invalid)
        }
        Cell::Empty => Err(invalid()),
    }
}

fn parse_value(cell: &Cell, metric: Metric, row: usize) -> Result<Option<f64>, CrudecastError> {
    let value = match cell {
        Cell::Empty => return Ok(None),
        Cell::Int(i) => *i as f64,
        Cell::Float(v) => *v,
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>().map_err(|_| CrudecastError::InvalidValue {
                row,
                column: metric.column().to_string(),
                value: s.to_string(),
            })?
        }
    };
    // NaN and infinities count as missing, like blank cells.
    Ok(value.is_finite().then_some(value))
}
