//! gce-ssh-sync
//!
//! Keeps the Google Compute Engine section of an SSH config in step with
//! an instance inventory.

mod cli;
mod commands;
mod display;
mod error;
mod instances;
mod logging;
mod settings;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::Result;
use settings::{RunConfig, Settings};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let settings = Settings::load(cli.settings.as_deref())?;
    let config = RunConfig::resolve(&cli, settings);
    tracing::debug!("Using SSH config at {}", config.ssh_config.display());

    commands::sync::run(&cli, &config)
}
