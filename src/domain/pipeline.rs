//! Forecast pipeline: three independent per-metric forecasts, then the join.

use super::comparison::ComparisonTable;
use super::error::CrudecastError;
use super::forecast::{make_future_dates, Forecast};
use super::horizon::Horizon;
use super::market::MarketTable;
use super::metric::Metric;
use crate::ports::forecast_port::ForecastModel;

/// Everything one run produces; discarded when the caller is done with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub horizon: Horizon,
    pub model: String,
    pub forecasts: Vec<Forecast>,
    pub comparison: ComparisonTable,
}

impl ForecastRun {
    pub fn forecast(&self, metric: Metric) -> Option<&Forecast> {
        self.forecasts.iter().find(|f| f.metric == metric)
    }
}

/// Forecast price, demand and supply over a shared date axis.
///
/// The axis is the table's distinct history dates followed by January 1st of
/// each of the next `horizon` years. Any metric failing aborts the run.
pub fn run_forecast(
    table: &MarketTable,
    horizon: Horizon,
    model: &dyn ForecastModel,
) -> Result<ForecastRun, CrudecastError> {
    let last_date = table.last_date().ok_or(CrudecastError::EmptyTable)?;
    let future = make_future_dates(last_date, horizon)?;
    let mut axis = table.dates();
    let history_len = axis.len();
    axis.extend_from_slice(&future);

    let mut forecasts = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let series = table.series(metric);
        log::info!(
            "fitting {} model for {} ({} observations)",
            model.name(),
            metric,
            series.len()
        );
        let fitted = model.fit(&series)?;
        let points = fitted.predict(&axis);
        forecasts.push(Forecast {
            metric,
            points,
            history_len,
            observed: series.points().to_vec(),
        });
    }

    let comparison = ComparisonTable::assemble(&forecasts)?;
    log::info!(
        "forecast complete: {} future rows from {} history dates",
        comparison.len(),
        history_len
    );

    Ok(ForecastRun {
        horizon,
        model: model.name().to_string(),
        forecasts,
        comparison,
    })
}
