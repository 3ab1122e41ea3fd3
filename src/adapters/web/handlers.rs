//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

use crate::adapters::csv_adapter::comparison_to_string;
use crate::adapters::html_report_adapter::{render_report, APP_TITLE};
use crate::adapters::ingest::{load_market_table, ACCEPTED_EXTENSIONS};
use crate::domain::comparison::CSV_FILE_NAME;
use crate::domain::error::CrudecastError;
use crate::domain::horizon::{Horizon, MAX_YEARS, MIN_YEARS};
use crate::domain::metric::required_columns;
use crate::domain::pipeline::{run_forecast as run_pipeline, ForecastRun};

use super::templates::IndexTemplate;
use super::{AppState, WebError};

/// Fields of the upload form.
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    years: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, WebError> {
    let mut file = None;
    let mut years = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::new(e.status(), format!("invalid upload: {}", e.body_text())))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    WebError::new(e.status(), format!("invalid upload: {}", e.body_text()))
                })?;
                file = Some((file_name, data.to_vec()));
            }
            Some("years") => {
                let text = field.text().await.map_err(|e| {
                    WebError::new(e.status(), format!("invalid upload: {}", e.body_text()))
                })?;
                years = Some(text);
            }
            _ => {}
        }
    }

    match file {
        Some((file_name, bytes)) if !file_name.is_empty() || !bytes.is_empty() => Ok(Upload {
            file_name,
            bytes,
            years,
        }),
        _ => Err(WebError::bad_request(format!(
            "please upload a file with columns: {}",
            required_columns().join(", ")
        ))),
    }
}

fn forecast_upload(state: &AppState, upload: &Upload) -> Result<ForecastRun, CrudecastError> {
    let horizon = match upload.years.as_deref() {
        Some(years) => Horizon::parse(years)?,
        None => state.default_horizon,
    };
    let table = load_market_table(&upload.file_name, &upload.bytes)?;
    log::info!(
        "forecasting {} ({} rows) for {}",
        upload.file_name,
        table.len(),
        horizon
    );
    let model = state.settings.build();
    run_pipeline(&table, horizon, model.as_ref())
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let template = IndexTemplate {
        title: APP_TITLE,
        accept,
        min_years: MIN_YEARS,
        max_years: MAX_YEARS,
        default_years: state.default_horizon.years(),
        required_columns: required_columns().join(", "),
    };
    template
        .render()
        .map(Html)
        .map_err(|e| CrudecastError::Render {
            reason: e.to_string(),
        })
        .map_err(WebError::from)
}

/// Run the forecast and render the report with an embedded CSV download.
pub async fn run_forecast(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, WebError> {
    let upload = read_upload(multipart).await?;
    let run = forecast_upload(&state, &upload)?;
    let csv = comparison_to_string(&run.comparison)?;
    let href = format!("data:text/csv;base64,{}", STANDARD.encode(csv));
    Ok(Html(render_report(&run, &href)?))
}

/// Run the forecast and answer with the comparison CSV as an attachment.
pub async fn download_csv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let upload = read_upload(multipart).await?;
    let run = forecast_upload(&state, &upload)?;
    let csv = comparison_to_string(&run.comparison)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("page not found")
}
