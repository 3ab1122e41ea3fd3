//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod forecast_model;
pub mod html_report_adapter;
pub mod ingest;
#[cfg(feature = "web")]
pub mod web;
pub mod xlsx_adapter;
