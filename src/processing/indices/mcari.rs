// src/processing/indices/mcari.rs
use gdal::raster::Buffer;

use super::{zip3, EPSILON};

/// MCARI = ((RED - GREEN) - 0.2 * (RED - BLUE)) / (RED / GREEN + e)
///
/// Only the outer ratio is offset; a zero GREEN still divides RED by zero.
#[inline]
pub fn mcari(red: f32, green: f32, blue: f32) -> f32 {
    ((red - green) - 0.2 * (red - blue)) / (red / green + EPSILON)
}

pub fn calculate_mcari(red: &Buffer<f32>, green: &Buffer<f32>, blue: &Buffer<f32>) -> Buffer<f32> {
    zip3(red, green, blue, mcari)
}
