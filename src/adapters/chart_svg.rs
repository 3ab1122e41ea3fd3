//! SVG chart rendering for forecast plots and the comparison chart.

use crate::domain::comparison::ComparisonTable;
use crate::domain::forecast::Forecast;
use crate::domain::metric::Metric;
use crate::domain::series::fractional_year;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;
const MAX_X_TICKS: f64 = 10.0;

const FORECAST_COLOR: &str = "#0072B2";

/// Stroke for one metric's line in the comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: &'static str,
    pub dasharray: Option<&'static str>,
}

pub fn line_style(metric: Metric) -> LineStyle {
    match metric {
        Metric::AvgPrice => LineStyle {
            color: "blue",
            dasharray: None,
        },
        Metric::GlobalDemand => LineStyle {
            color: "green",
            dasharray: Some("8,4"),
        },
        Metric::GlobalSupply => LineStyle {
            color: "red",
            dasharray: Some("2,3"),
        },
    }
}

/// Data ranges mapped onto the plot area.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(xs: &[f64], ys: &[f64]) -> Self {
        let (mut x_min, mut x_max) = bounds(xs);
        let (mut y_min, mut y_max) = bounds(ys);
        if x_max - x_min < f64::EPSILON {
            x_min -= 0.5;
            x_max += 0.5;
        }
        let pad = if y_max - y_min < f64::EPSILON {
            y_min.abs().max(1.0) * 0.1
        } else {
            (y_max - y_min) * 0.05
        };
        y_min -= pad;
        y_max += pad;
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn x(&self, v: f64) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (v - self.x_min) / (self.x_max - self.x_min) * plot_width
    }

    fn y(&self, v: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (v - self.y_min) / (self.y_max - self.y_min) * plot_height
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 10.0 {
        format!("{:.0}", value)
    } else if step >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn open_svg(title: &str) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif" font-size="12">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    ));
    svg
}

/// Grid lines, tick labels, axis lines and axis titles.
fn push_axes(svg: &mut String, frame: &Frame, x_label: &str, y_label: &str) {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let y_step = (frame.y_max - frame.y_min) / Y_TICKS as f64;
    for i in 0..=Y_TICKS {
        let value = frame.y_min + y_step * i as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#dddddd"/>"##
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            left - 6.0,
            y + 4.0,
            format_tick(value, y_step)
        ));
    }

    let x_step = ((frame.x_max - frame.x_min) / MAX_X_TICKS).ceil().max(1.0);
    let mut year = frame.x_min.ceil();
    while year <= frame.x_max {
        let x = frame.x(year);
        svg.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#dddddd"/>"##
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{:.0}</text>"#,
            x,
            bottom + 18.0,
            year
        ));
        year += x_step;
    }

    svg.push_str(&format!(
        r#"<line x1="{left:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#
    ));
    svg.push_str(&format!(
        r#"<line x1="{left:.1}" y1="{top:.1}" x2="{left:.1}" y2="{bottom:.1}" stroke="black"/>"#
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        (left + right) / 2.0,
        HEIGHT - 10.0,
        escape(x_label)
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">{}</text>"#,
        (top + bottom) / 2.0,
        (top + bottom) / 2.0,
        escape(y_label)
    ));
}

fn points_attr(frame: &Frame, values: impl Iterator<Item = (f64, f64)>) -> String {
    values
        .map(|(x, y)| format!("{:.1},{:.1}", frame.x(x), frame.y(y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Observed values as dots, point estimate as a line, bounds as a band.
pub fn forecast_svg(forecast: &Forecast) -> String {
    if forecast.points.is_empty() {
        return "No forecast data available.".to_string();
    }

    let xs: Vec<f64> = forecast
        .points
        .iter()
        .map(|p| fractional_year(p.date))
        .chain(forecast.observed.iter().map(|&(d, _)| fractional_year(d)))
        .collect();
    let ys: Vec<f64> = forecast
        .points
        .iter()
        .flat_map(|p| [p.yhat_lower, p.yhat_upper, p.yhat])
        .chain(forecast.observed.iter().map(|&(_, v)| v))
        .collect();
    let frame = Frame::new(&xs, &ys);

    let mut svg = open_svg(&format!("Forecast: {}", forecast.metric.column()));
    push_axes(&mut svg, &frame, "Year", forecast.metric.column());

    let upper = forecast
        .points
        .iter()
        .map(|p| (fractional_year(p.date), p.yhat_upper));
    let lower = forecast
        .points
        .iter()
        .rev()
        .map(|p| (fractional_year(p.date), p.yhat_lower));
    svg.push_str(&format!(
        r#"<polygon class="interval" points="{}" fill="{}" fill-opacity="0.2" stroke="none"/>"#,
        points_attr(&frame, upper.chain(lower)),
        FORECAST_COLOR
    ));

    svg.push_str(&format!(
        r#"<polyline class="yhat" points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        points_attr(
            &frame,
            forecast
                .points
                .iter()
                .map(|p| (fractional_year(p.date), p.yhat))
        ),
        FORECAST_COLOR
    ));

    for &(date, value) in &forecast.observed {
        svg.push_str(&format!(
            r#"<circle class="observed" cx="{:.1}" cy="{:.1}" r="3" fill="black"/>"#,
            frame.x(fractional_year(date)),
            frame.y(value)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Price, demand and supply point estimates by year, with legend and grid.
pub fn comparison_svg(table: &ComparisonTable) -> String {
    if table.is_empty() {
        return "No comparison data available.".to_string();
    }

    let xs: Vec<f64> = table.rows().iter().map(|r| r.year as f64).collect();
    let ys: Vec<f64> = table
        .rows()
        .iter()
        .flat_map(|r| Metric::ALL.map(|m| r.value(m)))
        .collect();
    let frame = Frame::new(&xs, &ys);

    let mut svg = open_svg("Comparison Forecast");
    push_axes(&mut svg, &frame, "Year", "Value");

    for metric in Metric::ALL {
        let style = line_style(metric);
        let dash = style
            .dasharray
            .map(|d| format!(r#" stroke-dasharray="{d}""#))
            .unwrap_or_default();
        svg.push_str(&format!(
            r#"<polyline class="series" points="{}" fill="none" stroke="{}" stroke-width="2"{}/>"#,
            points_attr(
                &frame,
                table.rows().iter().map(|r| (r.year as f64, r.value(metric)))
            ),
            style.color,
            dash
        ));
        for row in table.rows() {
            svg.push_str(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{}"/>"#,
                frame.x(row.year as f64),
                frame.y(row.value(metric)),
                style.color
            ));
        }
    }

    push_legend(&mut svg);
    svg.push_str("</svg>");
    svg
}

fn push_legend(svg: &mut String) {
    let x = WIDTH - MARGIN_RIGHT - 150.0;
    let y = MARGIN_TOP + 8.0;
    svg.push_str(&format!(
        r##"<rect x="{:.1}" y="{:.1}" width="140" height="66" fill="white" stroke="#999999"/>"##,
        x,
        y
    ));
    for (i, metric) in Metric::ALL.iter().enumerate() {
        let style = line_style(*metric);
        let row_y = y + 16.0 + i as f64 * 18.0;
        let dash = style
            .dasharray
            .map(|d| format!(r#" stroke-dasharray="{d}""#))
            .unwrap_or_default();
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"{}/>"#,
            x + 8.0,
            row_y,
            x + 36.0,
            row_y,
            style.color,
            dash
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            x + 42.0,
            row_y + 4.0,
            escape(metric.label())
        ));
    }
}
