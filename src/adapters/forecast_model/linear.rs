//! Linear trend model.
//!
//! Fits `y = mean_y + slope * (t - mean_t)` by ordinary least squares, where
//! `t` is the observation date as a fractional year.

use super::interval::{residual_std, IntervalBand};
use crate::domain::error::CrudecastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::series::{fractional_year, TimeSeries};
use crate::ports::forecast_port::{check_fittable, FittedModel, ForecastModel};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct LinearTrendModel {
    interval_width: f64,
}

impl LinearTrendModel {
    pub fn new(interval_width: f64) -> Self {
        Self { interval_width }
    }
}

impl ForecastModel for LinearTrendModel {
    fn name(&self) -> &str {
        "linear"
    }

    fn fit(&self, series: &TimeSeries) -> Result<Box<dyn FittedModel>, CrudecastError> {
        check_fittable(series)?;

        let ts: Vec<f64> = series
            .points()
            .iter()
            .map(|&(d, _)| fractional_year(d))
            .collect();
        let ys: Vec<f64> = series.points().iter().map(|&(_, y)| y).collect();
        let n = ys.len() as f64;

        let mean_t = ts.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let sxx: f64 = ts.iter().map(|t| (t - mean_t).powi(2)).sum();
        let sxy: f64 = ts
            .iter()
            .zip(&ys)
            .map(|(t, y)| (t - mean_t) * (y - mean_y))
            .sum();
        // Two distinct dates guarantee a positive spread.
        let slope = sxy / sxx;

        let residuals: Vec<f64> = ts
            .iter()
            .zip(&ys)
            .map(|(t, y)| y - (mean_y + slope * (t - mean_t)))
            .collect();
        let last_t = ts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Box::new(FittedLinearTrend {
            mean_t,
            mean_y,
            slope,
            last_t,
            band: IntervalBand::new(self.interval_width, residual_std(&residuals)),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedLinearTrend {
    mean_t: f64,
    mean_y: f64,
    slope: f64,
    last_t: f64,
    band: IntervalBand,
}

impl FittedModel for FittedLinearTrend {
    fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint> {
        dates
            .iter()
            .map(|&date| {
                let t = fractional_year(date);
                let yhat = self.mean_y + self.slope * (t - self.mean_t);
                let (yhat_lower, yhat_upper) = self.band.bounds(yhat, t - self.last_t);
                ForecastPoint {
                    date,
                    yhat,
                    yhat_lower,
                    yhat_upper,
                }
            })
            .collect()
    }
}
