// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `detfix`: evaluate, parse, format and audit deterministic fixed-point
//! values from the command line.
//!
//! ```text
//! detfix eval sin 1.25
//! detfix --repr fixed32 parse 3.14159
//! detfix format -- -2.5 '*^+10.3f'
//! detfix accuracy -f exp -f ln --samples 500 --format json
//! detfix features
//! ```

mod cli;
mod commands;
mod config;
mod functions;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::{FileConfig, Settings};

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let samples = match &cli.command {
        Commands::Accuracy(args) => args.samples,
        _ => None,
    };
    let settings = Settings::resolve(&cli, &file, samples);
    tracing::debug!(?settings, "resolved settings");

    let report = commands::run(&cli.command, &settings)?;
    let text = report.render(settings.format)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
