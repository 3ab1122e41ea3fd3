//! Comparison table: the three point forecasts joined on the future axis.

use super::error::CrudecastError;
use super::forecast::Forecast;
use super::metric::{Metric, YEAR_COLUMN};
use chrono::Datelike;

/// Fixed name of the downloadable comparison file.
pub const CSV_FILE_NAME: &str = "brent_forecast_comparison.csv";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub year: i32,
    pub avg_price: f64,
    pub global_demand: f64,
    pub global_supply: f64,
}

impl ComparisonRow {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgPrice => self.avg_price,
            Metric::GlobalDemand => self.global_demand,
            Metric::GlobalSupply => self.global_supply,
        }
    }

    /// Row as text cells; shared by the CSV export and the on-screen table.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.year.to_string()];
        fields.extend(Metric::ALL.iter().map(|&m| format_value(self.value(m))));
        fields
    }
}

/// Shortest round-trip representation, always with a fractional part.
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Join the future points of the price, demand and supply forecasts.
    pub fn assemble(forecasts: &[Forecast]) -> Result<Self, CrudecastError> {
        let find = |metric: Metric| {
            forecasts
                .iter()
                .find(|f| f.metric == metric)
                .ok_or_else(|| CrudecastError::ForecastMismatch {
                    reason: format!("no forecast for {metric}"),
                })
        };
        let price = find(Metric::AvgPrice)?.future();
        let demand = find(Metric::GlobalDemand)?.future();
        let supply = find(Metric::GlobalSupply)?.future();

        if price.len() != demand.len() || price.len() != supply.len() {
            return Err(CrudecastError::ForecastMismatch {
                reason: format!(
                    "future lengths differ: price {}, demand {}, supply {}",
                    price.len(),
                    demand.len(),
                    supply.len()
                ),
            });
        }

        let mut rows = Vec::with_capacity(price.len());
        for ((p, d), s) in price.iter().zip(demand).zip(supply) {
            if p.date != d.date || p.date != s.date {
                return Err(CrudecastError::ForecastMismatch {
                    reason: format!(
                        "future dates differ: {} / {} / {}",
                        p.date, d.date, s.date
                    ),
                });
            }
            rows.push(ComparisonRow {
                year: p.date.year(),
                avg_price: p.yhat,
                global_demand: d.yhat,
                global_supply: s.yhat,
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn headers() -> Vec<&'static str> {
        let mut headers = vec![YEAR_COLUMN];
        headers.extend(Metric::ALL.iter().map(|m| m.column()));
        headers
    }
}
