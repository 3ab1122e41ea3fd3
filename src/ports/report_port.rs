//! Report generation port trait.

use crate::domain::error::CrudecastError;
use crate::domain::pipeline::ForecastRun;
use std::path::{Path, PathBuf};

/// Port for writing forecast outputs into a directory.
pub trait ReportPort {
    /// Write the output and return the path of the file written.
    fn write(&self, run: &ForecastRun, output_dir: &Path) -> Result<PathBuf, CrudecastError>;
}
