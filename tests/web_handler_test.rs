#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Upload form renders with file input and horizon slider
//! - Forecast submission returns charts, table and CSV link
//! - Input and forecast errors render the error page without charts
//! - CSV download endpoint returns an attachment
//! - The embedded CSV link carries the same rows as the rendered table

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use common::*;
use crudecast::adapters::forecast_model::ModelSettings;
use crudecast::adapters::web::{AppState, build_router};
use crudecast::domain::horizon::Horizon;
use tower::ServiceExt;

const BOUNDARY: &str = "crudecast-test-boundary";

fn create_test_app() -> Router {
    build_router(AppState {
        settings: ModelSettings::default(),
        default_horizon: Horizon::default(),
        max_upload_bytes: 1024 * 1024,
    })
}

fn multipart_body(file_name: &str, content: &[u8], years: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
    if let Some(years) = years {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"years\"\r\n\r\n{years}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, file_name: &str, content: &[u8], years: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file_name, content, years)))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

mod index_tests {
    use super::*;

    #[tokio::test]
    async fn index_renders_with_ok_status() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_contains_upload_form_and_slider() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_string(response).await;

        assert!(body.contains("Brent Crude Oil Forecast Tool"));
        assert!(body.contains("type=\"file\""));
        assert!(body.contains("accept=\".xlsx,.xls,.ods,.csv\""));
        assert!(body.contains("type=\"range\""));
        assert!(body.contains("min=\"1\""));
        assert!(body.contains("max=\"20\""));
        assert!(body.contains("value=\"10\""));
        // Headers pass through the HTML escaper, which also rewrites `/`.
        assert!(body.contains("Avg Price ("));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod forecast_tests {
    use super::*;

    #[tokio::test]
    async fn submission_returns_report() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), Some("5")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert_eq!(body.matches("<svg").count(), 4);
        assert!(body.contains("Forecast: Avg Price ("));
        assert!(body.contains("Forecast: Global Demand (mb"));
        assert!(body.contains("Forecast: Global Supply (mb"));
        assert!(body.contains("Comparison Forecast"));
        assert!(body.contains("<td>2024</td>"));
        assert!(body.contains("<td>2028</td>"));
        assert!(!body.contains("<td>2029</td>"));
        assert!(body.contains("href=\"data:text/csv;base64,"));
        assert!(body.contains("download=\"brent_forecast_comparison.csv\""));
        assert!(body.contains("completed successfully"));
    }

    #[tokio::test]
    async fn xlsx_submission_returns_report() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.xlsx", &sample_xlsx(), Some("5")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert_eq!(body.matches("<svg").count(), 4);
        assert!(body.contains("<td>2024</td>"));
        assert!(body.contains("<td>2028</td>"));
        assert!(!body.contains("❌ Error:"));
    }

    #[tokio::test]
    async fn missing_years_uses_default_horizon() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), None))
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("<td>2033</td>"));
        assert!(!body.contains("<td>2034</td>"));
    }

    #[tokio::test]
    async fn missing_column_shows_error_without_charts() {
        let csv = b"Year,Avg Price ($/bbl),Global Demand (mb/d)\n2021,70.9,97.1\n2022,99.0,99.6\n";
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", csv, Some("5")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_string(response).await;
        assert!(body.contains("❌ Error:"));
        assert!(body.contains("Global Supply (mb"));
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn out_of_range_years_is_bad_request() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), Some("21")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_years_echoes_the_submitted_text() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), Some("ten")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_string(response).await;
        assert!(body.contains("ten"));
        assert!(body.contains("whole number of years"));
        assert!(!body.contains("horizon 0"));
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn unsupported_format_is_bad_request() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.pdf", b"%PDF", Some("5")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sparse_metric_is_unprocessable() {
        let csv = b"Year,Avg Price ($/bbl),Global Demand (mb/d),Global Supply (mb/d)\n\
                    2021,70.9,97.1,\n2022,99.0,99.6,100.0\n";
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", csv, Some("5")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(!body.contains("<svg"));
    }
}

mod download_tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    const DATA_URI_PREFIX: &str = "href=\"data:text/csv;base64,";

    fn unescape(text: &str) -> String {
        text.replace("&#x2f;", "/")
            .replace("&#47;", "/")
            .replace("&#x27;", "'")
            .replace("&quot;", "\"")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    /// Cell text of every `<tr>` in the comparison table, header row first.
    fn comparison_table_rows(html: &str) -> Vec<Vec<String>> {
        let start = html.find("<table id=\"comparison\">").unwrap();
        let end = start + html[start..].find("</table>").unwrap();
        let table = &html[start..end];

        table
            .split("<tr>")
            .skip(1)
            .map(|tr| {
                let tr = &tr[..tr.find("</tr>").unwrap()];
                tr.split("</t")
                    .filter_map(|chunk| {
                        let open = chunk.rfind("<th>").or_else(|| chunk.rfind("<td>"))?;
                        Some(unescape(&chunk[open + 4..]))
                    })
                    .collect()
            })
            .collect()
    }

    fn embedded_csv(html: &str) -> String {
        let start = html.find(DATA_URI_PREFIX).unwrap() + DATA_URI_PREFIX.len();
        let end = start + html[start..].find('"').unwrap();
        let bytes = STANDARD.decode(&html[start..end]).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[tokio::test]
    async fn downloaded_csv_matches_displayed_table() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), Some("4")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;

        let rows = comparison_table_rows(&html);
        let csv = embedded_csv(&html);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(lines.len(), rows.len());
        assert_eq!(
            rows[0],
            vec![
                "Year",
                "Avg Price ($/bbl)",
                "Global Demand (mb/d)",
                "Global Supply (mb/d)"
            ]
        );
        for (line, cells) in lines.iter().zip(&rows) {
            assert_eq!(*line, cells.join(","));
        }
        assert_eq!(rows[1][0], "2024");
        assert_eq!(rows[4][0], "2027");
    }

    #[tokio::test]
    async fn embedded_csv_matches_download_endpoint() {
        let page = create_test_app()
            .oneshot(upload_request("/forecast", "brent.csv", SAMPLE_CSV.as_bytes(), Some("6")))
            .await
            .unwrap();
        let embedded = embedded_csv(&body_string(page).await);

        let download = create_test_app()
            .oneshot(upload_request("/forecast/csv", "brent.csv", SAMPLE_CSV.as_bytes(), Some("6")))
            .await
            .unwrap();
        assert_eq!(embedded, body_string(download).await);
    }

    #[tokio::test]
    async fn csv_download_is_an_attachment() {
        let response = create_test_app()
            .oneshot(upload_request("/forecast/csv", "brent.csv", SAMPLE_CSV.as_bytes(), Some("3")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"brent_forecast_comparison.csv\""
        );
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv"));

        let body = body_string(response).await;
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Year,Avg Price ($/bbl),Global Demand (mb/d),Global Supply (mb/d)"
        );
        assert!(lines[3].starts_with("2026,"));
    }
}
