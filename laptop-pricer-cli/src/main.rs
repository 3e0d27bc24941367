//! laptop-pricer CLI — price estimates from laptop hardware specifications.
//!
//! Every command prints JSON to stdout; logs go to stderr and a daily JSON log file.

mod commands;

use clap::Parser;
use laptop_pricer_core::{ErrorResponse, PricerError, StatusClass};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Laptop Price Predictor: estimate a laptop's price from its specifications
#[derive(Parser, Debug)]
#[command(name = "laptop-pricer", version, about, long_about = None)]
struct Cli {
    /// Workspace directory; relative artifact paths resolve against it
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the pipeline artifact location
    #[arg(long)]
    pipeline: Option<PathBuf>,

    /// Override the reference dataset location
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Predict the price of one specification (JSON object)
    Predict {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Predict one price per line of a JSON Lines file
    PredictBatch {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Maximum predictions in flight
        #[arg(short = 'j', long, default_value = "4")]
        concurrency: usize,
    },
    /// List the categorical values seen in the reference dataset
    Features,
    /// Print everything an input form needs: categories, option lists, bounds and defaults
    Form,
    /// Load the artifacts and report whether the service can predict
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default config to `.laptop-pricer/config.toml` in the workspace
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr; stdout carries command output
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "laptop-pricer", "laptop-pricer")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "laptop-pricer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config =
        laptop_pricer_core::load_config(Some(&workspace), cli.config.as_deref(), None)
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Apply CLI overrides
    if let Some(pipeline) = cli.pipeline {
        config.artifacts.pipeline_path = pipeline;
    }
    if let Some(dataset) = cli.dataset {
        config.artifacts.dataset_path = dataset;
    }
    config.artifacts = config.artifacts.resolved(&workspace);
    config.validate()?;

    match commands::handle_command(cli.command, config, &workspace).await {
        Ok(code) => Ok(code),
        Err(err) => match failure_report(&err) {
            Some((body, status)) => {
                tracing::error!(error = %err, "Command failed");
                eprintln!("{}", serde_json::to_string_pretty(&body)?);
                Ok(ExitCode::from(status))
            }
            None => Err(err),
        },
    }
}

/// Error body and exit status for a failed command, when the failure is a
/// pricing error. Other failures propagate to anyhow's report.
fn failure_report(err: &anyhow::Error) -> Option<(ErrorResponse, u8)> {
    let pricer_err = err.downcast_ref::<PricerError>()?;
    Some((
        ErrorResponse::from(pricer_err),
        exit_status(pricer_err.status_class()),
    ))
}

/// Process exit status for each error class.
fn exit_status(class: StatusClass) -> u8 {
    match class {
        StatusClass::Internal => 1,
        StatusClass::ClientError => 2,
        StatusClass::Unavailable => 3,
    }
}
