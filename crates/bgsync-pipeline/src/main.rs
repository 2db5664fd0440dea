//! bgsync - background image sync
//!
//! Runs as the Lambda bootstrap when started by the Lambda runtime, or once from the
//! command line for local runs.

use anyhow::{Context, Result};
use bgsync_common::logging::{init_logging, LogConfig, LogLevel};
use bgsync_pipeline::{
    config::PipelineConfig, handler::function_handler, pipeline::ImagePipeline, storage,
};
use clap::{Parser, Subcommand};
use lambda_runtime::service_fn;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bgsync")]
#[command(author, version, about = "Fetch random photos, resize them and upload them to S3")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve Lambda invocations (default inside Lambda)
    Lambda,

    /// Run the pipeline once and exit (default elsewhere)
    Run {
        /// Named AWS profile for S3 credentials
        #[arg(long, env = "AWS_PROFILE")]
        profile: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    let _guard = init_logging(&log_config)?;

    let command = cli.command.unwrap_or_else(|| {
        if std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
            Command::Lambda
        } else {
            Command::Run {
                profile: std::env::var("AWS_PROFILE").ok(),
            }
        }
    });

    let config = PipelineConfig::load().context("Invalid configuration")?;

    match command {
        Command::Lambda => {
            let store = storage::connect(&config.storage, None).await?;
            let pipeline = ImagePipeline::new(config, store)?;
            let pipeline = &pipeline;

            info!("Starting Lambda runtime");
            lambda_runtime::run(service_fn(move |event| function_handler(event, pipeline)))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        },
        Command::Run { profile } => {
            let store = storage::connect(&config.storage, profile.as_deref()).await?;
            let pipeline = ImagePipeline::new(config, store)?;

            let report = pipeline.run().await?;

            if !report.is_complete() {
                warn!(
                    partial = report.partial(),
                    failed = report.failed(),
                    "Some uploads were skipped"
                );
            }

            info!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to render run report")?
            );
        },
    }

    Ok(())
}
