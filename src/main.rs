use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use file_search::cli::{self, Cli};
use file_search::search::{LocalLister, SearchConfig};

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays a clean list of paths
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("file_search=warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let args = Cli::parse();
    let config = SearchConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    cli::run(&args, &config, LocalLister::new(), &mut input, &mut output)?;
    Ok(())
}
