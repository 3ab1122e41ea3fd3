//! Per-metric forecast output and the annual future date axis.

use super::error::CrudecastError;
use super::horizon::Horizon;
use super::market::year_to_date;
use super::metric::Metric;
use chrono::{Datelike, NaiveDate};

/// Model output for one date: point estimate and uncertainty bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Forecast for one metric: history points followed by future points.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub metric: Metric,
    pub points: Vec<ForecastPoint>,
    /// Number of leading points that fall on history dates.
    pub history_len: usize,
    /// Observations the model was fitted on, for plotting.
    pub observed: Vec<(NaiveDate, f64)>,
}

impl Forecast {
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len.min(self.points.len())]
    }

    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len.min(self.points.len())..]
    }
}

/// January 1st of each of the `horizon` years following `last_date`.
pub fn make_future_dates(
    last_date: NaiveDate,
    horizon: Horizon,
) -> Result<Vec<NaiveDate>, CrudecastError> {
    (1..=horizon.years() as i32)
        .map(|offset| {
            let year = last_date.year() + offset;
            year_to_date(year).ok_or_else(|| CrudecastError::ForecastMismatch {
                reason: format!("future year {year} is out of range"),
            })
        })
        .collect()
}
