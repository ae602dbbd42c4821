// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use raster_index::batch;
use raster_index::cli::{Cli, Commands};
use raster_index::processing::SpectralIndex;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::All { input } => {
            let config = cli.options.to_config(input.clone());
            batch::run(&config)
                .with_context(|| format!("failed to process {}", input.display()))?;
        }
        Commands::Index { input, names } => {
            let config = cli.options.to_config(input.clone());
            batch::run_named(&config, names)
                .with_context(|| format!("failed to process {}", input.display()))?;
        }
        Commands::Stats { input } => {
            let config = cli.options.to_config(input.clone());
            for summary in batch::run_stats(&config)? {
                println!("{}", summary);
            }
        }
        Commands::List => {
            for index in SpectralIndex::ALL {
                let inputs: Vec<_> = index
                    .inputs()
                    .iter()
                    .map(|role| format!("{}({})", role.label(), role.default_key()))
                    .collect();
                println!(
                    "{:<6} {:<46} {:<24} {}",
                    index.name(),
                    index.long_name(),
                    inputs.join(", "),
                    index.formula()
                );
            }
        }
        Commands::Batch { config } => {
            batch::process_batch(config)
                .with_context(|| format!("batch run from {} failed", config.display()))?;
        }
    }

    Ok(())
}
