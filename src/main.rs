//! Shoebill Updater CLI - Main entry point
//!
//! `check` lists available updates, `update` downloads and replaces them.

use anyhow::Context;
use clap::Parser;
use shoebill_updater::engine::{
    cli::{formatter::CliFormatter, Cli, OutputFormat},
    updater::{HttpTransport, Updater},
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            CliFormatter::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Run one update pass; per-file failures are reported, not returned
fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let server_root = cli.get_server_root();

    let transport = HttpTransport::new().context("Could not create HTTP client")?;
    let mut updater = Updater::load(server_root, transport)?;
    if let Some(url) = &cli.url {
        updater = updater.with_update_url(url.clone());
    }
    if let Some(platform) = &cli.platform {
        updater = updater.with_platform(platform.clone());
    }

    let summary = updater.run(cli.command.mode())?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => CliFormatter::summary(&summary),
    }

    Ok(())
}
