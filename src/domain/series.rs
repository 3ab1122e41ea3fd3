//! Date-indexed numeric series fed to a forecast model.

use super::metric::Metric;
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    metric: Metric,
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn new(metric: Metric, points: Vec<(NaiveDate, f64)>) -> Self {
        Self { metric, points }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points sorted by date; equal dates keep file order.
    pub fn sorted_points(&self) -> Vec<(NaiveDate, f64)> {
        let mut points = self.points.clone();
        points.sort_by_key(|&(date, _)| date);
        points
    }

    pub fn distinct_dates(&self) -> usize {
        let mut dates: Vec<NaiveDate> = self.points.iter().map(|&(d, _)| d).collect();
        dates.sort();
        dates.dedup();
        dates.len()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|&(d, _)| d).max()
    }
}

/// Date as a continuous year value: January 1st of 2020 is 2020.0.
pub fn fractional_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    year as f64 + date.ordinal0() as f64 / days_in_year
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn fractional_year_of_new_year_is_whole() {
        assert_relative_eq!(fractional_year(d(2021, 1, 1)), 2021.0);
    }

    #[test]
    fn fractional_year_handles_leap_years() {
        assert_relative_eq!(fractional_year(d(2020, 7, 2)), 2020.0 + 183.0 / 366.0);
        assert_relative_eq!(fractional_year(d(2021, 7, 2)), 2021.0 + 182.0 / 365.0);
    }

    #[test]
    fn sorted_points_and_distinct_dates() {
        let series = TimeSeries::new(
            Metric::AvgPrice,
            vec![(d(2022, 1, 1), 3.0), (d(2020, 1, 1), 1.0), (d(2022, 1, 1), 4.0)],
        );
        let sorted = series.sorted_points();
        assert_eq!(sorted[0], (d(2020, 1, 1), 1.0));
        assert_eq!(sorted[1], (d(2022, 1, 1), 3.0));
        assert_eq!(series.distinct_dates(), 2);
        assert_eq!(series.last_date(), Some(d(2022, 1, 1)));
    }
}
