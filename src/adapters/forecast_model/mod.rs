//! Forecast model adapters and their configuration.

pub mod holt;
pub mod interval;
pub mod linear;

use crate::domain::error::CrudecastError;
use crate::ports::config_port::ConfigPort;
use crate::ports::forecast_port::ForecastModel;
use holt::HoltLinearModel;
use linear::LinearTrendModel;
use std::fmt;
use std::str::FromStr;

const SECTION: &str = "forecast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Linear,
    Holt,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "holt" => Ok(ModelKind::Holt),
            other => Err(format!("unknown model '{other}' (expected linear or holt)")),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Linear => f.write_str("linear"),
            ModelKind::Holt => f.write_str("holt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub kind: ModelKind,
    /// Share of the predictive distribution covered by the bounds.
    pub interval_width: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            kind: ModelKind::Linear,
            interval_width: 0.80,
            alpha: 0.5,
            beta: 0.3,
        }
    }
}

impl ModelSettings {
    /// Read `[forecast]` settings; `kind_override` wins over `model`.
    pub fn from_config(
        config: &dyn ConfigPort,
        kind_override: Option<&str>,
    ) -> Result<Self, CrudecastError> {
        let defaults = Self::default();
        let kind = match kind_override
            .map(str::to_string)
            .or_else(|| config.get_string(SECTION, "model"))
        {
            Some(name) => name
                .parse::<ModelKind>()
                .map_err(|reason| invalid("model", reason))?,
            None => defaults.kind,
        };

        let settings = Self {
            kind,
            interval_width: config.get_double(SECTION, "interval_width", defaults.interval_width),
            alpha: config.get_double(SECTION, "alpha", defaults.alpha),
            beta: config.get_double(SECTION, "beta", defaults.beta),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CrudecastError> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(invalid(
                "interval_width",
                format!("{} is not between 0 and 1", self.interval_width),
            ));
        }
        for (key, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(key, format!("{value} is not in (0, 1]")));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Box<dyn ForecastModel> {
        match self.kind {
            ModelKind::Linear => Box::new(LinearTrendModel::new(self.interval_width)),
            ModelKind::Holt => Box::new(HoltLinearModel::new(
                self.alpha,
                self.beta,
                self.interval_width,
            )),
        }
    }
}

fn invalid(key: &str, reason: String) -> CrudecastError {
    CrudecastError::ConfigInvalid {
        section: SECTION.into(),
        key: key.into(),
        reason,
    }
}
