//! Seam CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `seam.toml` (or `--config`) and validate it.
//! 2. **Wire observability**: configure `tracing-subscriber` with a pretty or
//!    JSON layer and, optionally, an OpenTelemetry OTLP exporter.
//! 3. **Construct providers**: pick a concrete provider for each capability
//!    (`RestUserDirectory` or `FakeUserDirectory`, `FileRecordStore` or
//!    `InMemoryRecordStore`, `WebhookNotifier` or `RecordingNotifier`) and
//!    inject them into the services.
//! 4. **Run one sub-command** and print its result as JSON on stdout.

mod commands;
mod config;
mod telemetry;
mod wiring;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::commands::Command;
use crate::config::SeamConfig;
use crate::wiring::Providers;

#[derive(Debug, Parser)]
#[command(name = "seam", version, about = "Call capability providers through their consumer services")]
struct Cli {
    /// Configuration file (default: ./seam.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SeamConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let _telemetry = telemetry::init(&config.logging)?;

    let services = Providers::from_config(&config)
        .await
        .context("constructing providers")?
        .into_services();

    let output = commands::execute(cli.command, &services).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
