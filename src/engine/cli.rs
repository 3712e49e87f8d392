//! Shoebill Updater CLI Module
//! Command-line interface for checking and applying component updates

pub mod formatter;

use crate::engine::updater::RunMode;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shoebill-updater")]
#[command(author = "Shoebill Team")]
#[command(version)]
#[command(about = "Keeps the Shoebill launcher, dependency manager and plugin up to date", long_about = None)]
pub struct Cli {
    /// Server directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Update server endpoint, overrides updater.config.json
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// OS identifier used to pick file names (defaults to the host OS)
    #[arg(long, global = true)]
    pub platform: Option<String>,

    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// List available updates without changing any file
    Check,

    /// Download and replace out-of-date files
    Update,
}

impl Commands {
    pub fn mode(&self) -> RunMode {
        match self {
            Commands::Check => RunMode::ListOnly,
            Commands::Update => RunMode::Download,
        }
    }
}

impl Cli {
    /// Get server directory, defaulting to current directory
    pub fn get_server_root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
