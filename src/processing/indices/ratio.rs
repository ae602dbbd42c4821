// src/processing/indices/ratio.rs
use gdal::raster::Buffer;

use super::{zip2, EPSILON};

/// Simple band ratio A / (B + e), used by SR (NIR / RED) and MSI (SWIR / NIR)
#[inline]
pub fn ratio(numerator: f32, denominator: f32) -> f32 {
    numerator / (denominator + EPSILON)
}

pub fn calculate_ratio(numerator: &Buffer<f32>, denominator: &Buffer<f32>) -> Buffer<f32> {
    zip2(numerator, denominator, ratio)
}
