//! Holt's linear exponential smoothing (level + trend).

use super::interval::{residual_std, IntervalBand};
use crate::domain::error::CrudecastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::series::{fractional_year, TimeSeries};
use crate::ports::forecast_port::{check_fittable, FittedModel, ForecastModel};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct HoltLinearModel {
    alpha: f64,
    beta: f64,
    interval_width: f64,
}

impl HoltLinearModel {
    pub fn new(alpha: f64, beta: f64, interval_width: f64) -> Self {
        Self {
            alpha,
            beta,
            interval_width,
        }
    }
}

/// Sorted observations with same-date values averaged.
fn merge_same_dates(series: &TimeSeries) -> Vec<(NaiveDate, f64)> {
    series
        .sorted_points()
        .chunk_by(|a, b| a.0 == b.0)
        .map(|group| {
            let sum: f64 = group.iter().map(|&(_, v)| v).sum();
            (group[0].0, sum / group.len() as f64)
        })
        .collect()
}

impl ForecastModel for HoltLinearModel {
    fn name(&self) -> &str {
        "holt"
    }

    fn fit(&self, series: &TimeSeries) -> Result<Box<dyn FittedModel>, CrudecastError> {
        check_fittable(series)?;
        let points = merge_same_dates(series);
        let n = points.len();

        let first_t = fractional_year(points[0].0);
        let last_t = fractional_year(points[n - 1].0);
        let step_years = (last_t - first_t) / (n - 1) as f64;

        let mut level = points[0].1;
        let mut trend = points[1].1 - points[0].1;
        let mut fitted = Vec::with_capacity(n);
        let mut residuals = Vec::with_capacity(n - 1);
        fitted.push((points[0].0, level));

        for &(date, value) in &points[1..] {
            let one_step = level + trend;
            fitted.push((date, one_step));
            residuals.push(value - one_step);

            let prev_level = level;
            level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * trend;
        }

        Ok(Box::new(FittedHolt {
            level,
            trend,
            step_years,
            last_t,
            fitted,
            band: IntervalBand::new(self.interval_width, residual_std(&residuals)),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedHolt {
    level: f64,
    /// Trend per observation step.
    trend: f64,
    step_years: f64,
    last_t: f64,
    fitted: Vec<(NaiveDate, f64)>,
    band: IntervalBand,
}

impl FittedHolt {
    /// Extrapolate the final level and trend to fractional year `t`.
    fn extrapolate(&self, t: f64) -> f64 {
        self.level + self.trend * (t - self.last_t) / self.step_years
    }
}

impl FittedModel for FittedHolt {
    fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint> {
        dates
            .iter()
            .map(|&date| {
                let t = fractional_year(date);
                let yhat = match self.fitted.binary_search_by_key(&date, |&(d, _)| d) {
                    Ok(i) => self.fitted[i].1,
                    Err(_) => self.extrapolate(t),
                };
                let steps_ahead = (t - self.last_t) / self.step_years;
                let (yhat_lower, yhat_upper) = self.band.bounds(yhat, steps_ahead);
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
