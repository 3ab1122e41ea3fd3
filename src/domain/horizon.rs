//! Forecast horizon: number of future years to project.

use super::error::CrudecastError;
use std::fmt;

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 20;
pub const DEFAULT_YEARS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Horizon(u32);

impl Horizon {
    pub fn new(years: i64) -> Result<Self, CrudecastError> {
        if years < MIN_YEARS as i64 || years > MAX_YEARS as i64 {
            return Err(CrudecastError::InvalidHorizon {
                years,
                min: MIN_YEARS,
                max: MAX_YEARS,
            });
        }
        Ok(Self(years as u32))
    }

    pub fn years(self) -> u32 {
        self.0
    }

    /// Parse a horizon from form or CLI text.
    pub fn parse(value: &str) -> Result<Self, CrudecastError> {
        let trimmed = value.trim();
        let years: i64 = trimmed
            .parse()
            .map_err(|_| CrudecastError::HorizonNotANumber {
                value: trimmed.to_string(),
                min: MIN_YEARS,
                max: MAX_YEARS,
            })?;
        Self::new(years)
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(DEFAULT_YEARS)
    }
}

impl TryFrom<i64> for Horizon {
    type Error = CrudecastError;

    fn try_from(years: i64) -> Result<Self, Self::Error> {
        Self::new(years)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Horizon::new(1).unwrap().years(), 1);
        assert_eq!(Horizon::new(20).unwrap().years(), 20);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Horizon::new(0),
            Err(CrudecastError::InvalidHorizon { years: 0, .. })
        ));
        assert!(matches!(
            Horizon::new(21),
            Err(CrudecastError::InvalidHorizon { years: 21, .. })
        ));
        assert!(Horizon::new(-3).is_err());
    }

    #[test]
    fn default_is_ten_years() {
        assert_eq!(Horizon::default().years(), 10);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Horizon::parse(" 7 ").unwrap().years(), 7);
        assert!(Horizon::parse("seven").is_err());
    }

    #[test]
    fn parse_reports_the_text_it_could_not_read() {
        let err = Horizon::parse(" ten ").unwrap_err();
        assert!(matches!(
            err,
            CrudecastError::HorizonNotANumber { ref value, .. } if value == "ten"
        ));
        let message = err.to_string();
        assert!(message.contains("\"ten\""));
        assert!(!message.contains(" 0:"));
        assert!(message.contains("between 1 and 20"));
    }

    #[test]
    fn parse_keeps_out_of_range_number_in_error() {
        assert!(matches!(
            Horizon::parse("25"),
            Err(CrudecastError::InvalidHorizon { years: 25, .. })
        ));
    }
}
