//! Web server adapter.
//!
//! Serves the upload form, runs forecasts on submitted files and returns the
//! rendered report. Nothing is kept between requests.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::adapters::forecast_model::ModelSettings;
use crate::domain::error::CrudecastError;
use crate::domain::horizon::Horizon;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub settings: ModelSettings,
    /// Slider position when the form is first shown.
    pub default_horizon: Horizon,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build state from `[forecast]` and `[web]` config sections.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CrudecastError> {
        let settings = ModelSettings::from_config(config, None)?;
        let default_horizon = Horizon::new(config.get_int(
            "forecast",
            "years",
            i64::from(Horizon::default().years()),
        ))
        .map_err(|e| CrudecastError::ConfigInvalid {
            section: "forecast".into(),
            key: "years".into(),
            reason: e.to_string(),
        })?;
        let max_upload = config.get_int("web", "max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64);
        let max_upload_bytes =
            usize::try_from(max_upload).map_err(|_| CrudecastError::ConfigInvalid {
                section: "web".into(),
                key: "max_upload_bytes".into(),
                reason: format!("{max_upload} is negative"),
            })?;

        Ok(Self {
            settings,
            default_horizon,
            max_upload_bytes,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/forecast", post(handlers::run_forecast))
        .route("/forecast/csv", post(handlers::download_csv))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state))
}

/// Bind `listen` and serve until the process is stopped.
pub async fn serve(listen: &str, state: AppState) -> Result<(), CrudecastError> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
