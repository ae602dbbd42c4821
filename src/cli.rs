// src/cli.rs
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::io::OutputNaming;
use crate::processing::indices::savi::DEFAULT_SOIL_FACTOR;

#[derive(Parser)]
#[command(name = "raster-index", version)]
#[command(about = "Vegetation and moisture spectral indices from a multi-band raster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: RunOptions,

    /// Log band reads and other details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute and save every index
    All {
        /// Multi-band input raster
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compute and save the named indices (e.g. NDVI SR)
    Index {
        /// Multi-band input raster
        #[arg(short, long)]
        input: PathBuf,

        /// Index names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print mean/min/max of every index without writing files
    Stats {
        /// Multi-band input raster
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the supported indices and their formulas
    List,

    /// Run from a JSON configuration file
    Batch {
        /// Configuration file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Naming {
    /// {input-name}_{INDEX}.tif
    Prefixed,
    /// {INDEX}.tif
    Plain,
}

impl From<Naming> for OutputNaming {
    fn from(naming: Naming) -> Self {
        match naming {
            Naming::Prefixed => OutputNaming::Prefixed,
            Naming::Plain => OutputNaming::Plain,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Output directory (created if absent)
    #[arg(short, long, default_value = "output", global = true)]
    pub output_dir: PathBuf,

    /// Output file naming
    #[arg(long, value_enum, default_value_t = Naming::Prefixed, global = true)]
    pub naming: Naming,

    /// Band key used as red for NDVI
    #[arg(long, default_value = "B4", global = true)]
    pub red_band: String,

    /// SAVI soil adjustment factor
    #[arg(short = 'l', long, default_value_t = DEFAULT_SOIL_FACTOR, global = true)]
    pub soil_factor: f32,

    /// Read each band once and reuse it across indices
    #[arg(long, global = true)]
    pub cache_bands: bool,

    /// Print per-index statistics after saving
    #[arg(long, global = true)]
    pub stats: bool,

    /// Compression (DEFLATE, LZW, ZSTD, NONE)
    #[arg(long, default_value = "DEFLATE", global = true)]
    pub compress: String,

    /// Compression level
    #[arg(long, default_value_t = 6, global = true)]
    pub compress_level: u8,

    /// Write striped instead of tiled GeoTIFFs
    #[arg(long, global = true)]
    pub no_tiled: bool,
}

impl RunOptions {
    pub fn to_config(&self, input: PathBuf) -> RunConfig {
        let mut config = RunConfig::new(input, self.output_dir.clone());
        config.naming = self.naming.into();
        config.ndvi_red_band = self.red_band.clone();
        config.soil_factor = self.soil_factor;
        config.cache_bands = self.cache_bands;
        config.print_stats = self.stats;
        config.output.compress = self.compress.clone();
        config.output.compress_level = self.compress_level;
        config.output.tiled = !self.no_tiled;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn options_map_onto_config() {
        let cli = Cli::parse_from([
            "raster-index",
            "index",
            "-i",
            "scene.tif",
            "NDVI",
            "SR",
            "--naming",
            "plain",
            "--red-band",
            "B3",
            "--no-tiled",
            "-o",
            "out",
        ]);

        let Commands::Index { input, names } = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(names, vec!["NDVI", "SR"]);

        let config = cli.options.to_config(input);
        assert_eq!(config.input, PathBuf::from("scene.tif"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.naming, OutputNaming::Plain);
        assert_eq!(config.ndvi_red_band, "B3");
        assert!(!config.output.tiled);
        assert_eq!(config.soil_factor, DEFAULT_SOIL_FACTOR);
    }
}
