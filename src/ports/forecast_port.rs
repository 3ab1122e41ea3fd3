//! Forecasting model port traits.
//!
//! The pipeline treats the model as a black box: fit a date-indexed series,
//! then predict point estimates and bounds for any list of dates.

use crate::domain::error::CrudecastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::series::TimeSeries;
use chrono::NaiveDate;

/// Minimum observations a model needs to fit a trend.
pub const MIN_OBSERVATIONS: usize = 2;

pub trait ForecastModel: Send + Sync {
    fn name(&self) -> &str;

    /// Fit the series. Every call returns an independent fitted model.
    fn fit(&self, series: &TimeSeries) -> Result<Box<dyn FittedModel>, CrudecastError>;
}

pub trait FittedModel: Send + Sync {
    /// One point per requested date, in the same order.
    fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint>;
}

/// Reject series a trend cannot be fitted to.
pub fn check_fittable(series: &TimeSeries) -> Result<(), CrudecastError> {
    let observations = series.len();
    if observations < MIN_OBSERVATIONS || series.distinct_dates() < MIN_OBSERVATIONS {
        return Err(CrudecastError::InsufficientData {
            metric: series.metric().to_string(),
            observations,
            minimum: MIN_OBSERVATIONS,
        });
    }
    Ok(())
}
