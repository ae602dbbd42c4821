// src/batch.rs
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::io::Raster;
use crate::processing::Calculator;
use crate::utils::IndexSummary;

/// Create `output_dir` when it does not exist yet
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
        info!("Output folder created: {}", output_dir.display());
    }
    Ok(())
}

fn open_raster(config: &RunConfig) -> Result<Raster> {
    info!("Input raster: {}", config.input.display());
    let raster = Raster::open(&config.input)?;
    Ok(if config.cache_bands {
        raster.with_band_cache()
    } else {
        raster
    })
}

fn build_calculator<'a>(config: &'a RunConfig, raster: &'a Raster) -> Result<Calculator<'a>> {
    Ok(Calculator::new(raster, &config.bands)
        .with_naming(config.naming)
        .with_write_options(config.output.clone())
        .with_calculations(config.definitions()?))
}

/// Compute and save every configured index. The raster is closed on return.
pub fn run(config: &RunConfig) -> Result<Vec<PathBuf>> {
    ensure_output_dir(&config.output_dir)?;
    let raster = open_raster(config)?;
    let calculator = build_calculator(config, &raster)?;

    info!(
        "Computing {} indices into {}",
        calculator.len(),
        config.output_dir.display()
    );
    let written = calculator.save_all_indices(&config.output_dir)?;

    if config.print_stats {
        calculator.print_all_indices()?;
    }

    info!("Processing complete: {} files written", written.len());
    Ok(written)
}

/// Compute and save only `names`, looked up among the configured indices
pub fn run_named(config: &RunConfig, names: &[String]) -> Result<Vec<PathBuf>> {
    ensure_output_dir(&config.output_dir)?;
    let raster = open_raster(config)?;
    let calculator = build_calculator(config, &raster)?;

    let mut written = Vec::with_capacity(names.len());
    for name in names {
        let name = name.to_uppercase();
        written.push(calculator.save_index(&name, &config.output_dir)?);
    }

    if config.print_stats {
        calculator.print_all_indices()?;
    }

    info!("Processing complete: {} files written", written.len());
    Ok(written)
}

/// Compute every configured index and report its statistics without writing files
pub fn run_stats(config: &RunConfig) -> Result<Vec<IndexSummary>> {
    let raster = open_raster(config)?;
    let calculator = build_calculator(config, &raster)?;
    calculator.summaries()
}

/// Run from a JSON configuration file
pub fn process_batch(config_path: &Path) -> Result<Vec<PathBuf>> {
    let config = RunConfig::from_file(config_path)?;
    info!("Loaded configuration from {}", config_path.display());
    run(&config)
}
