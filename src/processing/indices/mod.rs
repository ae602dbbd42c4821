// src/processing/indices/mod.rs
pub mod evi;
pub mod mcari;
pub mod ndi;
pub mod ratio;
pub mod savi;

use gdal::raster::Buffer;
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Offset added to ratio denominators so that all-zero pixels yield a finite value
pub const EPSILON: f32 = 1e-10;

/// Spectral role of an input band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandRole {
    Nir,
    Red,
    Green,
    Blue,
    Swir,
}

impl BandRole {
    /// Sentinel-2 band key conventionally used for this role
    pub fn default_key(&self) -> &'static str {
        match self {
            BandRole::Nir => "B8",
            BandRole::Red => "B4",
            BandRole::Green => "B3",
            BandRole::Blue => "B2",
            BandRole::Swir => "B11",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BandRole::Nir => "NIR",
            BandRole::Red => "RED",
            BandRole::Green => "GREEN",
            BandRole::Blue => "BLUE",
            BandRole::Swir => "SWIR",
        }
    }
}

/// The catalog of supported indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectralIndex {
    Ndvi,
    Ndwi,
    Sr,
    Ndmi,
    Gndvi,
    Mcari,
    Evi,
    Savi { soil_factor: f32 },
    Msi,
}

impl SpectralIndex {
    /// Every index, in the order the full run computes them
    pub const ALL: [SpectralIndex; 9] = [
        SpectralIndex::Ndvi,
        SpectralIndex::Ndwi,
        SpectralIndex::Sr,
        SpectralIndex::Ndmi,
        SpectralIndex::Gndvi,
        SpectralIndex::Mcari,
        SpectralIndex::Evi,
        SpectralIndex::Savi {
            soil_factor: savi::DEFAULT_SOIL_FACTOR,
        },
        SpectralIndex::Msi,
    ];

    /// Look up an index by name, ignoring case. SAVI gets the default soil factor.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|index| index.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::UnknownIndex(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpectralIndex::Ndvi => "NDVI",
            SpectralIndex::Ndwi => "NDWI",
            SpectralIndex::Sr => "SR",
            SpectralIndex::Ndmi => "NDMI",
            SpectralIndex::Gndvi => "GNDVI",
            SpectralIndex::Mcari => "MCARI",
            SpectralIndex::Evi => "EVI",
            SpectralIndex::Savi { .. } => "SAVI",
            SpectralIndex::Msi => "MSI",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            SpectralIndex::Ndvi => "Normalized Difference Vegetation Index",
            SpectralIndex::Ndwi => "Normalized Difference Water Index",
            SpectralIndex::Sr => "Simple Ratio",
            SpectralIndex::Ndmi => "Normalized Difference Moisture Index",
            SpectralIndex::Gndvi => "Green Normalized Difference Vegetation Index",
            SpectralIndex::Mcari => "Modified Chlorophyll Absorption Ratio Index",
            SpectralIndex::Evi => "Enhanced Vegetation Index",
            SpectralIndex::Savi { .. } => "Soil Adjusted Vegetation Index",
            SpectralIndex::Msi => "Moisture Stress Index",
        }
    }

    /// Input roles, in the order `calculate` expects its buffers
    pub fn inputs(&self) -> &'static [BandRole] {
        use BandRole::*;
        match self {
            SpectralIndex::Ndvi | SpectralIndex::Sr => &[Nir, Red],
            SpectralIndex::Ndwi => &[Green, Nir],
            SpectralIndex::Ndmi => &[Nir, Swir],
            SpectralIndex::Gndvi => &[Nir, Green],
            SpectralIndex::Mcari => &[Red, Green, Blue],
            SpectralIndex::Evi => &[Nir, Red, Blue],
            SpectralIndex::Savi { .. } => &[Nir, Red],
            SpectralIndex::Msi => &[Swir, Nir],
        }
    }

    /// Band keys used when no override is configured
    pub fn default_bands(&self) -> Vec<String> {
        self.inputs()
            .iter()
            .map(|role| role.default_key().to_string())
            .collect()
    }

    pub fn formula(&self) -> String {
        match self {
            SpectralIndex::Ndvi => "(NIR - RED) / (NIR + RED + e)".to_string(),
            SpectralIndex::Ndwi => "(GREEN - NIR) / (GREEN + NIR + e)".to_string(),
            SpectralIndex::Sr => "NIR / (RED + e)".to_string(),
            SpectralIndex::Ndmi => "(NIR - SWIR) / (NIR + SWIR + e)".to_string(),
            SpectralIndex::Gndvi => "(NIR - GREEN) / (NIR + GREEN + e)".to_string(),
            SpectralIndex::Mcari => {
                "((RED - GREEN) - 0.2 * (RED - BLUE)) / (RED / GREEN + e)".to_string()
            }
            SpectralIndex::Evi => "2.5 * (NIR - RED) / (NIR + 6 * RED - 7.5 * BLUE + 1)".to_string(),
            SpectralIndex::Savi { soil_factor } => format!(
                "((NIR - RED) / (NIR + RED + {l})) * (1 + {l})",
                l = soil_factor
            ),
            SpectralIndex::Msi => "SWIR / (NIR + e)".to_string(),
        }
    }

    /// Evaluate the index over `inputs`, ordered as in [`SpectralIndex::inputs`].
    ///
    /// All buffers must share one shape; the result has that shape too.
    pub fn calculate(&self, inputs: &[Buffer<f32>]) -> Result<Buffer<f32>> {
        let expected = self.inputs().len();
        if inputs.len() != expected {
            return Err(Error::InputCount {
                index: self.name(),
                expected,
                found: inputs.len(),
            });
        }

        let shape = inputs[0].shape();
        if let Some(other) = inputs.iter().find(|buffer| buffer.shape() != shape) {
            return Err(Error::ShapeMismatch {
                expected: shape,
                found: other.shape(),
            });
        }

        let result = match *self {
            SpectralIndex::Ndvi
            | SpectralIndex::Ndwi
            | SpectralIndex::Ndmi
            | SpectralIndex::Gndvi => ndi::calculate_ndi(&inputs[0], &inputs[1]),
            SpectralIndex::Sr | SpectralIndex::Msi => {
                ratio::calculate_ratio(&inputs[0], &inputs[1])
            }
            SpectralIndex::Mcari => mcari::calculate_mcari(&inputs[0], &inputs[1], &inputs[2]),
            SpectralIndex::Evi => evi::calculate_evi(&inputs[0], &inputs[1], &inputs[2]),
            SpectralIndex::Savi { soil_factor } => {
                savi::calculate_savi(&inputs[0], &inputs[1], soil_factor)
            }
        };

        Ok(result)
    }
}

/// Apply `op` pixel by pixel over two same-shape bands
pub(crate) fn zip2<F>(a: &Buffer<f32>, b: &Buffer<f32>, op: F) -> Buffer<f32>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    let shape = a.shape();
    let a_data = a.data();
    let b_data = b.data();

    let mut result_data = vec![0.0f32; shape.0 * shape.1];
    result_data
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, result)| *result = op(a_data[i], b_data[i]));

    Buffer::new(shape, result_data)
}

/// Apply `op` pixel by pixel over three same-shape bands
pub(crate) fn zip3<F>(a: &Buffer<f32>, b: &Buffer<f32>, c: &Buffer<f32>, op: F) -> Buffer<f32>
where
    F: Fn(f32, f32, f32) -> f32 + Send + Sync,
{
    let shape = a.shape();
    let a_data = a.data();
    let b_data = b.data();
    let c_data = c.data();

    let mut result_data = vec![0.0f32; shape.0 * shape.1];
    result_data
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, result)| *result = op(a_data[i], b_data[i], c_data[i]));

    Buffer::new(shape, result_data)
}
