//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::forecast_model::ModelSettings;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::ingest::load_market_file;
use crate::domain::error::CrudecastError;
use crate::domain::horizon::Horizon;
use crate::domain::metric::Metric;
use crate::domain::pipeline::{run_forecast, ForecastRun};
use crate::ports::config_port::ConfigPort;
use crate::ports::forecast_port::check_fittable;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crudecast", about = "Brent crude oil price, demand and supply forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forecast price, demand and supply from a yearly market table
    Forecast {
        #[arg(short, long)]
        input: PathBuf,
        /// Number of future years (1-20)
        #[arg(short, long)]
        years: Option<i64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory for the CSV and HTML outputs
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Forecast model: linear or holt
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Check that an input table can be forecast
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Forecast {
            input,
            years,
            config,
            output,
            model,
        } => run_forecast_command(
            &input,
            years,
            config.as_deref(),
            output.as_deref(),
            model.as_deref(),
        ),
        Command::Validate { input } => run_validate(&input),
        Command::Serve { config } => run_serve(config.as_deref()),
    }
}

/// Load the INI config, or an empty one when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// `--years` wins over `[forecast] years`, which wins over the default.
pub fn resolve_horizon(
    years_override: Option<i64>,
    config: &dyn ConfigPort,
) -> Result<Horizon, CrudecastError> {
    match years_override {
        Some(years) => Horizon::new(years),
        None => {
            let default = i64::from(Horizon::default().years());
            let years = config.get_int("forecast", "years", default);
            Horizon::new(years).map_err(|e| CrudecastError::ConfigInvalid {
                section: "forecast".into(),
                key: "years".into(),
                reason: e.to_string(),
            })
        }
    }
}

/// `--output` wins over `[report] output_dir`; defaults to the working directory.
pub fn resolve_output_dir(output_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_path("report", "output_dir"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn run_forecast_command(
    input: &Path,
    years_override: Option<i64>,
    config_path: Option<&Path>,
    output_override: Option<&Path>,
    model_override: Option<&str>,
) -> ExitCode {
    // Stage 1: Load config
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Resolve horizon and model
    let horizon = match resolve_horizon(years_override, &config) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let settings = match ModelSettings::from_config(&config, model_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Load the market table
    eprintln!("Reading {}", input.display());
    let table = match load_market_file(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            return (&e).into();
        }
    };
    if let Some((first, last)) = table.year_span() {
        eprintln!("  {} rows, {} to {}", table.len(), first, last);
    }

    // Stage 4: Forecast
    eprintln!("Forecasting {} with the {} model...", horizon, settings.kind);
    let model = settings.build();
    let run = match run_forecast(&table, horizon, model.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Print console summary to stderr
    print_summary(&run);

    // Stage 6: Write outputs
    let output_dir = resolve_output_dir(output_override, &config);
    if let Err(e) = fs::create_dir_all(&output_dir) {
        let err = CrudecastError::from(e);
        eprintln!("error: failed to create {}: {err}", output_dir.display());
        return (&err).into();
    }

    let mut reporters: Vec<Box<dyn ReportPort>> = vec![Box::new(CsvReportAdapter)];
    if config.get_bool("report", "html", true) {
        reporters.push(Box::new(HtmlReportAdapter));
    }
    for reporter in &reporters {
        match reporter.write(&run, &output_dir) {
            Ok(path) => eprintln!("Written: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!("\n✅ Forecast and comparison completed successfully!");
    ExitCode::SUCCESS
}

fn print_summary(run: &ForecastRun) {
    eprintln!("\n=== Comparison Forecast ===");
    eprintln!(
        "{:>6}  {:>16}  {:>16}  {:>16}",
        "Year",
        Metric::AvgPrice.label(),
        Metric::GlobalDemand.label(),
        Metric::GlobalSupply.label()
    );
    for row in run.comparison.rows() {
        eprintln!(
            "{:>6}  {:>16.2}  {:>16.2}  {:>16.2}",
            row.year, row.avg_price, row.global_demand, row.global_supply
        );
    }
}

fn run_validate(input: &Path) -> ExitCode {
    eprintln!("Validating {}", input.display());
    let table = match load_market_file(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nRows: {}", table.len());
    if let Some((first, last)) = table.year_span() {
        eprintln!("Years: {} to {}", first, last);
    }

    let mut failure = None;
    for metric in Metric::ALL {
        let series = table.series(metric);
        match check_fittable(&series) {
            Ok(()) => eprintln!("  {}: {} observations", metric, series.len()),
            Err(e) => {
                eprintln!("  {}: {e}", metric);
                failure.get_or_insert(e);
            }
        }
    }

    match failure {
        Some(e) => (&e).into(),
        None => {
            eprintln!("\nInput table is valid.");
            ExitCode::SUCCESS
        }
    }
}

fn run_serve(config_path: Option<&Path>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{serve, AppState, DEFAULT_LISTEN};

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let state = match AppState::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        eprintln!("Starting web server on {}", listen);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                let err = CrudecastError::from(e);
                eprintln!("error: {err}");
                return (&err).into();
            }
        };

        match runtime.block_on(serve(&listen, state)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
