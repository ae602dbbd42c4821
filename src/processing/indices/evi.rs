// src/processing/indices/evi.rs
use gdal::raster::Buffer;

use super::zip3;

// EVI coefficients from MODIS documentation
const G: f32 = 2.5; // Gain factor
const L: f32 = 1.0; // Canopy background adjustment
const C1: f32 = 6.0; // Aerosol resistance (red)
const C2: f32 = 7.5; // Aerosol resistance (blue)

/// Enhanced Vegetation Index: G * (NIR - RED) / (NIR + C1 * RED - C2 * BLUE + L)
///
/// The denominator is not offset; pixels where it vanishes come out infinite.
#[inline]
pub fn evi(nir: f32, red: f32, blue: f32) -> f32 {
    G * (nir - red) / (nir + C1 * red - C2 * blue + L)
}

pub fn calculate_evi(nir: &Buffer<f32>, red: &Buffer<f32>, blue: &Buffer<f32>) -> Buffer<f32> {
    zip3(nir, red, blue, evi)
}
