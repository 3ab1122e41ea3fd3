//! Domain error types.

/// Top-level error type for crudecast.
#[derive(Debug, thiserror::Error)]
pub enum CrudecastError {
    #[error("unsupported file format: {file} (expected .xlsx, .xls, .ods or .csv)")]
    UnsupportedFormat { file: String },

    #[error("failed to read spreadsheet: {reason}")]
    Spreadsheet { reason: String },

    #[error("failed to read CSV: {reason}")]
    Csv { reason: String },

    #[error("missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("input table has no data rows")]
    EmptyTable,

    #[error("invalid year {value:?} in row {row}")]
    InvalidYear { row: usize, value: String },

    #[error("invalid value {value:?} for {column} in row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid forecast horizon {years}: must be between {min} and {max} years")]
    InvalidHorizon { years: i64, min: u32, max: u32 },

    #[error("invalid forecast horizon {value:?}: expected a whole number of years between {min} and {max}")]
    HorizonNotANumber { value: String, min: u32, max: u32 },

    #[error("insufficient data for {metric}: have {observations} observations, need {minimum}")]
    InsufficientData {
        metric: String,
        observations: usize,
        minimum: usize,
    },

    #[error("forecast mismatch: {reason}")]
    ForecastMismatch { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to render report: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrudecastError {
    /// True for errors caused by the uploaded table or the chosen horizon.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CrudecastError::UnsupportedFormat { .. }
                | CrudecastError::Spreadsheet { .. }
                | CrudecastError::Csv { .. }
                | CrudecastError::MissingColumns { .. }
                | CrudecastError::EmptyTable
                | CrudecastError::InvalidYear { .. }
                | CrudecastError::InvalidValue { .. }
                | CrudecastError::InvalidHorizon { .. }
                | CrudecastError::HorizonNotANumber { .. }
        )
    }

    /// True for errors raised while fitting or joining forecasts.
    pub fn is_forecast_error(&self) -> bool {
        matches!(
            self,
            CrudecastError::InsufficientData { .. } | CrudecastError::ForecastMismatch { .. }
        )
    }
}

impl From<&CrudecastError> for std::process::ExitCode {
    fn from(err: &CrudecastError) -> Self {
        let code: u8 = match err {
            CrudecastError::Io(_) | CrudecastError::Render { .. } => 1,
            CrudecastError::ConfigParse { .. } | CrudecastError::ConfigInvalid { .. } => 2,
            e if e.is_input_error() => 3,
            e if e.is_forecast_error() => 4,
            _ => 1,
        };
        std::process::ExitCode::from(code)
    }
}
