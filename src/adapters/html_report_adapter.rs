//! HTML report adapter implementing ReportPort.
//!
//! Renders the forecast report with Askama templates and inline SVG charts.
//! The web adapter reuses [`render_report`] with a data-URI download link.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;

use super::chart_svg::{comparison_svg, forecast_svg};
use crate::domain::comparison::{ComparisonTable, CSV_FILE_NAME};
use crate::domain::error::CrudecastError;
use crate::domain::pipeline::ForecastRun;
use crate::ports::report_port::ReportPort;

pub const APP_TITLE: &str = "🛢️ Brent Crude Oil Forecast Tool";
pub const REPORT_FILE_NAME: &str = "brent_forecast_report.html";

pub struct ChartSection {
    pub heading: String,
    pub svg: String,
}

/// Display-ready view of a forecast run.
pub struct ReportView {
    pub model: String,
    pub years: u32,
    pub charts: Vec<ChartSection>,
    pub comparison_svg: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ReportView {
    pub fn from_run(run: &ForecastRun) -> Self {
        let charts = run
            .forecasts
            .iter()
            .map(|forecast| ChartSection {
                heading: forecast.metric.heading(),
                svg: forecast_svg(forecast),
            })
            .collect();

        Self {
            model: run.model.clone(),
            years: run.horizon.years(),
            charts,
            comparison_svg: comparison_svg(&run.comparison),
            headers: ComparisonTable::headers(),
            rows: run.comparison.rows().iter().map(|r| r.fields()).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    view: &'a ReportView,
    download_href: &'a str,
    download_name: &'a str,
}

/// Render the full report page; `download_href` is the target of the CSV link.
pub fn render_report(run: &ForecastRun, download_href: &str) -> Result<String, CrudecastError> {
    let view = ReportView::from_run(run);
    let template = ReportTemplate {
        title: APP_TITLE,
        view: &view,
        download_href,
        download_name: CSV_FILE_NAME,
    };
    template.render().map_err(|e| CrudecastError::Render {
        reason: e.to_string(),
    })
}

/// Writes `brent_forecast_report.html` next to the comparison CSV.
pub struct HtmlReportAdapter;

impl ReportPort for HtmlReportAdapter {
    fn write(&self, run: &ForecastRun, output_dir: &Path) -> Result<PathBuf, CrudecastError> {
        let html = render_report(run, CSV_FILE_NAME)?;
        let path = output_dir.join(REPORT_FILE_NAME);
        fs::write(&path, html)?;
        log::debug!("wrote HTML report to {}", path.display());
        Ok(path)
    }
}
