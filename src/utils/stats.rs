// src/utils/stats.rs
use std::fmt;

use gdal::raster::Buffer;
use rayon::prelude::*;

/// Summary of one index array. Non-finite pixels (NaN, +/-inf) are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexStats {
    pub mean: f64,
    pub min: f32,
    pub max: f32,
    /// Number of finite pixels that contributed
    pub valid: usize,
    pub total: usize,
}

impl IndexStats {
    pub fn from_buffer(buffer: &Buffer<f32>) -> Self {
        Self::from_values(buffer.data())
    }

    pub fn from_values(values: &[f32]) -> Self {
        let (sum, min, max, valid) = values
            .par_iter()
            .filter(|value| value.is_finite())
            .fold(
                || (0.0f64, f32::INFINITY, f32::NEG_INFINITY, 0usize),
                |(sum, min, max, count), &value| {
                    (sum + value as f64, min.min(value), max.max(value), count + 1)
                },
            )
            .reduce(
                || (0.0f64, f32::INFINITY, f32::NEG_INFINITY, 0usize),
                |a, b| (a.0 + b.0, a.1.min(b.1), a.2.max(b.2), a.3 + b.3),
            );

        if valid == 0 {
            return Self {
                mean: f64::NAN,
                min: f32::NAN,
                max: f32::NAN,
                valid: 0,
                total: values.len(),
            };
        }

        Self {
            mean: sum / valid as f64,
            min,
            max,
            valid,
            total: values.len(),
        }
    }
}

/// Statistics labelled with the index they were computed for
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub name: String,
    pub stats: IndexStats,
}

impl fmt::Display for IndexSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: mean={:.6} min={:.6} max={:.6} valid={}/{}",
            self.name,
            self.stats.mean,
            self.stats.min,
            self.stats.max,
            self.stats.valid,
            self.stats.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_non_finite_pixels() {
        let stats = IndexStats::from_values(&[0.5, f32::NAN, -0.5, f32::INFINITY, 1.0]);
        assert_eq!(stats.valid, 3);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.min, -0.5);
        assert_eq!(stats.max, 1.0);
        assert!((stats.mean - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn all_invalid_gives_nan_mean() {
        let stats = IndexStats::from_values(&[f32::NAN, f32::NAN]);
        assert_eq!(stats.valid, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn summary_display() {
        let summary = IndexSummary {
            name: "NDVI".to_string(),
            stats: IndexStats::from_values(&[0.25, 0.75]),
        };
        assert_eq!(
            summary.to_string(),
            "NDVI: mean=0.500000 min=0.250000 max=0.750000 valid=2/2"
        );
    }
}
