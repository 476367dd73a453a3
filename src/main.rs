//! doizer CLI - add missing DOIs to your BibTeX files.

use clap::Parser;
use doizer::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env().add_directive("doizer=info".parse()?))
        .init();

    cli::run_command(&args)
}
