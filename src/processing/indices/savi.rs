// src/processing/indices/savi.rs
use gdal::raster::Buffer;

use super::zip2;

/// Soil adjustment factor used unless configured otherwise
pub const DEFAULT_SOIL_FACTOR: f32 = 0.428;

/// SAVI = ((NIR - RED) / (NIR + RED + L)) * (1 + L)
#[inline]
pub fn savi(nir: f32, red: f32, soil_factor: f32) -> f32 {
    ((nir - red) / (nir + red + soil_factor)) * (1.0 + soil_factor)
}

pub fn calculate_savi(nir: &Buffer<f32>, red: &Buffer<f32>, soil_factor: f32) -> Buffer<f32> {
    zip2(nir, red, move |nir_val, red_val| savi(nir_val, red_val, soil_factor))
}
