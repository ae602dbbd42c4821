// src/processing/calculator.rs
use gdal::raster::Buffer;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::BandMapping;
use crate::error::{Error, Result};
use crate::io::{write_index, OutputNaming, Raster, WriteOptions};
use crate::processing::indices::SpectralIndex;
use crate::utils::{IndexStats, IndexSummary};

/// One index together with the band keys feeding its inputs
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    index: SpectralIndex,
    bands: Vec<String>,
}

impl IndexDefinition {
    /// Use the conventional Sentinel-2 band keys for every input
    pub fn new(index: SpectralIndex) -> Self {
        Self {
            bands: index.default_bands(),
            index,
        }
    }

    /// Use explicit band keys, one per input role of `index`
    pub fn with_bands(index: SpectralIndex, bands: Vec<String>) -> Result<Self> {
        if bands.len() != index.inputs().len() {
            return Err(Error::InputCount {
                index: index.name(),
                expected: index.inputs().len(),
                found: bands.len(),
            });
        }
        Ok(Self { index, bands })
    }

    pub fn name(&self) -> &'static str {
        self.index.name()
    }

    pub fn index(&self) -> SpectralIndex {
        self.index
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Read this definition's bands from `raster` and evaluate the index
    pub fn compute(&self, raster: &Raster, mapping: &BandMapping) -> Result<Buffer<f32>> {
        let inputs = self
            .bands
            .iter()
            .map(|key| raster.read_band(mapping.resolve(key)?))
            .collect::<Result<Vec<_>>>()?;

        self.index.calculate(&inputs)
    }
}

/// Ordered set of index definitions evaluated against one open raster
pub struct Calculator<'a> {
    raster: &'a Raster,
    bands: &'a BandMapping,
    naming: OutputNaming,
    write_options: WriteOptions,
    calculations: Vec<IndexDefinition>,
}

impl<'a> Calculator<'a> {
    pub fn new(raster: &'a Raster, bands: &'a BandMapping) -> Self {
        Self {
            raster,
            bands,
            naming: OutputNaming::default(),
            write_options: WriteOptions::default(),
            calculations: Vec::new(),
        }
    }

    /// Calculator holding every catalog index with default band keys
    pub fn standard(raster: &'a Raster, bands: &'a BandMapping) -> Self {
        Self::new(raster, bands).with_calculations(
            SpectralIndex::ALL
                .iter()
                .map(|index| IndexDefinition::new(*index)),
        )
    }

    pub fn with_calculations(
        mut self,
        calculations: impl IntoIterator<Item = IndexDefinition>,
    ) -> Self {
        self.calculations.extend(calculations);
        self
    }

    pub fn with_naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_write_options(mut self, write_options: WriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    /// Append a definition. Names are not checked for duplicates.
    pub fn add_calculation(&mut self, calculation: IndexDefinition) {
        self.calculations.push(calculation);
    }

    pub fn calculations(&self) -> &[IndexDefinition] {
        &self.calculations
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.calculations.iter().map(IndexDefinition::name).collect()
    }

    pub fn len(&self) -> usize {
        self.calculations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculations.is_empty()
    }

    fn find(&self, name: &str) -> Result<&IndexDefinition> {
        match self.calculations.iter().find(|c| c.name() == name) {
            Some(calculation) => Ok(calculation),
            None => {
                warn!("Index with name {} not found", name);
                Err(Error::IndexNotFound(name.to_string()))
            }
        }
    }

    /// Compute the first held index called `name`
    pub fn make_calculation(&self, name: &str) -> Result<Buffer<f32>> {
        let calculation = self.find(name)?;
        info!("Index {} exists, computing", name);
        calculation.compute(self.raster, self.bands)
    }

    pub fn output_path(&self, output_dir: &Path, name: &str) -> PathBuf {
        output_dir.join(self.naming.file_name(self.raster.base_name(), name))
    }

    /// Compute the first held index called `name` and write it into `output_dir`
    pub fn save_index(&self, name: &str, output_dir: &Path) -> Result<PathBuf> {
        let calculation = self.find(name)?;
        self.save(calculation, output_dir)
    }

    fn save(&self, calculation: &IndexDefinition, output_dir: &Path) -> Result<PathBuf> {
        let data = calculation.compute(self.raster, self.bands)?;
        let output_path = self.output_path(output_dir, calculation.name());
        write_index(
            data,
            self.raster.geo_info(),
            &output_path,
            calculation.name(),
            &self.write_options,
        )?;
        Ok(output_path)
    }

    /// Compute and write every held index, in insertion order
    pub fn save_all_indices(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        self.calculations
            .iter()
            .map(|calculation| self.save(calculation, output_dir))
            .collect()
    }

    /// Compute every held index and summarize it, in insertion order
    pub fn summaries(&self) -> Result<Vec<IndexSummary>> {
        self.calculations
            .iter()
            .map(|calculation| {
                let data = calculation.compute(self.raster, self.bands)?;
                Ok(IndexSummary {
                    name: calculation.name().to_string(),
                    stats: IndexStats::from_buffer(&data),
                })
            })
            .collect()
    }

    /// Log the summary of every held index
    pub fn print_all_indices(&self) -> Result<Vec<IndexSummary>> {
        let summaries = self.summaries()?;
        for summary in &summaries {
            info!("{}", summary);
        }
        Ok(summaries)
    }
}
