#![allow(dead_code)]

use chrono::NaiveDate;
use crudecast::domain::error::CrudecastError;
use crudecast::domain::forecast::ForecastPoint;
use crudecast::domain::metric::Metric;
use crudecast::domain::market::{year_to_date, MarketRecord, MarketTable};
use crudecast::domain::series::TimeSeries;
use crudecast::ports::forecast_port::{check_fittable, FittedModel, ForecastModel};
use std::io::Write;

pub const SAMPLE_CSV: &str = "\
Year,Avg Price ($/bbl),Global Demand (mb/d),Global Supply (mb/d)
2015,52.39,95.0,96.6
2016,43.73,96.2,96.8
2017,54.19,97.8,97.4
2018,71.31,99.2,100.3
2019,64.21,100.5,100.6
2020,41.84,91.0,94.3
2021,70.86,97.1,95.7
2022,99.04,99.6,100.0
2023,82.49,101.8,101.9
";

/// The `SAMPLE_CSV` rows as an .xlsx workbook, with numeric cells stored as numbers.
pub fn sample_xlsx() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, line) in SAMPLE_CSV.lines().enumerate() {
        for (c, field) in line.split(',').enumerate() {
            let (cell_row, cell_col) = (r as u32, c as u16);
            match field.parse::<f64>() {
                Ok(v) => sheet.write_number(cell_row, cell_col, v).unwrap(),
                Err(_) => sheet.write_string(cell_row, cell_col, field).unwrap(),
            };
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn sample_table() -> MarketTable {
    crudecast::adapters::ingest::load_market_table("brent.csv", SAMPLE_CSV.as_bytes()).unwrap()
}

pub type Row = (i32, Option<f64>, Option<f64>, Option<f64>);

pub fn table_from_rows(rows: &[Row]) -> MarketTable {
    let records = rows
        .iter()
        .map(|&(year, avg_price, global_demand, global_supply)| MarketRecord {
            year,
            date: year_to_date(year).unwrap(),
            avg_price,
            global_demand,
            global_supply,
        })
        .collect();
    MarketTable::new(records).unwrap()
}

/// Yearly rows `first..=last` with simple linear values.
pub fn linear_rows(first: i32, last: i32) -> Vec<Row> {
    (first..=last)
        .map(|year| {
            let t = (year - first) as f64;
            (
                year,
                Some(50.0 + 2.0 * t),
                Some(90.0 + 0.5 * t),
                Some(91.0 + 0.4 * t),
            )
        })
        .collect()
}

pub fn write_temp_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

/// Predicts the mean of the observations for every date.
pub struct MeanModel;

struct FittedMean {
    mean: f64,
}

impl ForecastModel for MeanModel {
    fn name(&self) -> &str {
        "mean"
    }

    fn fit(&self, series: &TimeSeries) -> Result<Box<dyn FittedModel>, CrudecastError> {
        check_fittable(series)?;
        let sum: f64 = series.points().iter().map(|&(_, v)| v).sum();
        Ok(Box::new(FittedMean {
            mean: sum / series.len() as f64,
        }))
    }
}

impl FittedModel for FittedMean {
    fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint> {
        dates
            .iter()
            .map(|&date| ForecastPoint {
                date,
                yhat: self.mean,
                yhat_lower: self.mean - 1.0,
                yhat_upper: self.mean + 1.0,
            })
            .collect()
    }
}

/// Drops the last requested date for one metric, so the forecasts cannot be joined.
pub struct TruncatingModel {
    pub metric: Metric,
}

struct FittedTruncating {
    truncate: bool,
}

impl ForecastModel for TruncatingModel {
    fn name(&self) -> &str {
        "truncating"
    }

    fn fit(&self, series: &TimeSeries) -> Result<Box<dyn FittedModel>, CrudecastError> {
        Ok(Box::new(FittedTruncating {
            truncate: series.metric() == self.metric,
        }))
    }
}

impl FittedModel for FittedTruncating {
    fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint> {
        let keep = if self.truncate {
            dates.len().saturating_sub(1)
        } else {
            dates.len()
        };
        dates[..keep]
            .iter()
            .map(|&date| ForecastPoint {
                date,
                yhat: 0.0,
                yhat_lower: 0.0,
                yhat_upper: 0.0,
            })
            .collect()
    }
}
