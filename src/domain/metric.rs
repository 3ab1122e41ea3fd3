//! The three forecast metrics and their column names.

use std::fmt;

/// Header of the year column in the input table and the comparison CSV.
pub const YEAR_COLUMN: &str = "Year";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    AvgPrice,
    GlobalDemand,
    GlobalSupply,
}

impl Metric {
    /// All metrics in column order.
    pub const ALL: [Metric; 3] = [Metric::AvgPrice, Metric::GlobalDemand, Metric::GlobalSupply];

    /// Column header used in the input table and the comparison CSV.
    pub fn column(self) -> &'static str {
        match self {
            Metric::AvgPrice => "Avg Price ($/bbl)",
            Metric::GlobalDemand => "Global Demand (mb/d)",
            Metric::GlobalSupply => "Global Supply (mb/d)",
        }
    }

    /// Short legend label for the comparison chart.
    pub fn label(self) -> &'static str {
        match self {
            Metric::AvgPrice => "Price ($/bbl)",
            Metric::GlobalDemand => "Demand (mb/d)",
            Metric::GlobalSupply => "Supply (mb/d)",
        }
    }

    pub fn heading(self) -> String {
        let icon = match self {
            Metric::AvgPrice => "📊",
            Metric::GlobalDemand => "📈",
            Metric::GlobalSupply => "📉",
        };
        format!("{icon} Forecast: {}", self.column())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Every required input column, year first.
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![YEAR_COLUMN];
    columns.extend(Metric::ALL.iter().map(|m| m.column()));
    columns
}
