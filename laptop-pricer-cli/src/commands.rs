//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use anyhow::Context;
use futures::future::join_all;
use laptop_pricer_core::specification::ValidationRules;
use laptop_pricer_core::{
    ArtifactCache, ErrorResponse, FeaturesResponse, PredictionResponse, PredictionService,
    PricerConfig, PricerError, Specification, SpecificationInput, ValidationError,
};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    config: PricerConfig,
    workspace: &Path,
) -> anyhow::Result<ExitCode> {
    let service = PredictionService::new(Arc::new(ArtifactCache::from_config(&config.artifacts)));
    match command {
        Commands::Config { action } => return handle_config(action, &config, workspace),
        Commands::Predict { input } => {
            let body = read_input(&input).await?;
            let response = predict_one(&service, &config, &body).await?;
            print_json(&response)?;
        }
        Commands::PredictBatch { input, concurrency } => {
            let body = read_input(&input).await?;
            let results = predict_batch(&service, &config, &body, concurrency).await?;
            for line in results {
                println!("{}", serde_json::to_string(&line)?);
            }
        }
        Commands::Features => {
            let options = blocking(&service, |s| s.get_feature_options()).await?;
            print_json(&FeaturesResponse::success(options))?;
        }
        Commands::Form => {
            let form_config = config.clone();
            let schema = blocking(&service, move |s| s.form_schema(&form_config)).await?;
            print_json(&schema)?;
        }
        Commands::Health => {
            let version = config.api.version.clone();
            let report = tokio::task::spawn_blocking({
                let service = service.clone();
                move || service.health(&version)
            })
            .await?;
            print_json(&report)?;
            if !report.is_healthy() {
                return Ok(ExitCode::from(3));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(
    action: ConfigAction,
    config: &PricerConfig,
    workspace: &Path,
) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".laptop-pricer");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(ExitCode::SUCCESS);
            }

            let toml_str = toml::to_string_pretty(&PricerConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
        }
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Read a whole file, or stdin when `path` is `-`.
async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        tokio::io::stdin().read_to_string(&mut body).await?;
        Ok(body)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a service call on the blocking pool; artifact loading does file I/O.
async fn blocking<T, F>(service: &PredictionService, f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&PredictionService) -> Result<T, PricerError> + Send + 'static,
{
    let service = service.clone();
    Ok(tokio::task::spawn_blocking(move || f(&service)).await??)
}

fn parse_specification(body: &str, rules: &ValidationRules) -> anyhow::Result<Specification> {
    let input: SpecificationInput = serde_json::from_str(body)
        .map_err(|e| PricerError::from(ValidationError::MalformedBody(e.to_string())))?;
    Ok(Specification::new(input, rules).map_err(PricerError::from)?)
}

async fn predict_one(
    service: &PredictionService,
    config: &PricerConfig,
    body: &str,
) -> anyhow::Result<PredictionResponse> {
    let spec = parse_specification(body, &config.validation_rules())?;
    let currency = config.api.currency.clone();
    blocking(service, move |s| s.predict_response(spec, &currency)).await
}

/// One output line per non-blank input line, in input order. A failing line
/// yields an error body instead of aborting the batch.
async fn predict_batch(
    service: &PredictionService,
    config: &PricerConfig,
    body: &str,
    concurrency: usize,
) -> anyhow::Result<Vec<serde_json::Value>> {
    let limit = Arc::new(Semaphore::new(concurrency.max(1)));
    let lines: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    info!(count = lines.len(), concurrency, "Starting batch prediction");

    let tasks = lines.into_iter().enumerate().map(|(line_no, line)| {
        let limit = Arc::clone(&limit);
        async move {
            let _permit = limit.acquire().await?;
            let outcome = predict_one(service, config, line).await;
            anyhow::Ok(match outcome {
                Ok(response) => serde_json::to_value(response)?,
                Err(err) => {
                    warn!(line = line_no + 1, error = %err, "Batch line failed");
                    serde_json::to_value(error_body(&err))?
                }
            })
        }
    });

    join_all(tasks).await.into_iter().collect()
}

fn error_body(err: &anyhow::Error) -> ErrorResponse {
    match err.downcast_ref::<PricerError>() {
        Some(pricer_err) => ErrorResponse::from(pricer_err),
        None => ErrorResponse {
            error: "Invalid input".to_string(),
            detail: Some(format!("{err:#}")),
        },
    }
}
