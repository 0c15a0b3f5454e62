mod config;
mod ledger;
mod parser;
mod pipeline;
use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use pipeline::Pipeline;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Finds repeat donors in a contribution file and reports, per recipient,
/// zip code and year, the running percentile and totals of their donations.
#[derive(Parser, Debug)]
#[command(name = "repeat_donors", version, about)]
struct Cli {
    /// pipe-delimited contribution records
    data_file: PathBuf,
    /// file whose first line is a percentile between 0 and 100
    percentile_file: PathBuf,
    /// created or truncated; one line per repeat donation
    output_file: PathBuf,
}

fn main() -> Result<()> {
    // logs go to stderr, never into the output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repeat_donors=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_paths(cli.data_file, cli.percentile_file, cli.output_file)?;
    let percentile = config.load_percentile().with_context(|| {
        format!(
            "failed to read percentile from {}",
            config.percentile_file.display()
        )
    })?;
    info!(
        data_file = %config.data_file.display(),
        output_file = %config.output_file.display(),
        percentile = percentile.fraction() * 100.0,
        "processing contributions"
    );

    let input = File::open(&config.data_file)
        .with_context(|| format!("failed to open {}", config.data_file.display()))?;
    // truncates any previous output
    let output = File::create(&config.output_file)
        .with_context(|| format!("failed to create {}", config.output_file.display()))?;

    let mut pipeline = Pipeline::new(percentile);
    let stats = pipeline.run(input, output)?;
    stats.log();
    info!(
        donors = pipeline.donors.len(),
        recipient_groups = pipeline.recipients.len(),
        "final state"
    );

    Ok(())
}
