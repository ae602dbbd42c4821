// src/processing/indices/ndi.rs
use gdal::raster::Buffer;

use super::{zip2, EPSILON};

/// Normalized difference of two reflectances: (A - B) / (A + B + e)
///
/// Backs NDVI (NIR, RED), NDWI (GREEN, NIR), NDMI (NIR, SWIR) and
/// GNDVI (NIR, GREEN). A zero sum gives 0 instead of NaN.
#[inline]
pub fn normalized_difference(a: f32, b: f32) -> f32 {
    (a - b) / (a + b + EPSILON)
}

pub fn calculate_ndi(band_a: &Buffer<f32>, band_b: &Buffer<f32>) -> Buffer<f32> {
    zip2(band_a, band_b, normalized_difference)
}
