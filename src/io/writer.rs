// src/io/writer.rs
use gdal::raster::{Buffer, RasterCreationOptions};
use gdal::{DriverManager, Metadata};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use super::reader::GeoInfo;
use crate::error::{Error, Result};

/// How output files are named inside the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputNaming {
    /// `{base_name}_{INDEX}.tif`
    #[default]
    Prefixed,
    /// `{INDEX}.tif`
    Plain,
}

impl OutputNaming {
    pub fn file_name(&self, base_name: &str, index_name: &str) -> String {
        match self {
            OutputNaming::Prefixed => format!("{}_{}.tif", base_name, index_name),
            OutputNaming::Plain => format!("{}.tif", index_name),
        }
    }
}

/// GeoTIFF creation settings
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WriteOptions {
    #[serde(default = "default_compress")]
    pub compress: String,
    #[serde(default = "default_compress_level")]
    pub compress_level: u8,
    #[serde(default = "default_true")]
    pub tiled: bool,
}

fn default_compress() -> String {
    "DEFLATE".to_string()
}

fn default_compress_level() -> u8 {
    6
}

fn default_true() -> bool {
    true
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: default_compress(),
            compress_level: default_compress_level(),
            tiled: true,
        }
    }
}

impl WriteOptions {
    /// GTiff creation option strings
    pub fn option_strings(&self) -> Vec<String> {
        let mut options = Vec::new();
        let compress = self.compress.to_uppercase();

        // Add compression if not NONE
        if compress != "NONE" {
            options.push(format!("COMPRESS={}", compress));

            match compress.as_str() {
                "DEFLATE" => options.push(format!("ZLEVEL={}", self.compress_level.min(9))),
                "ZSTD" => options.push(format!("ZSTD_LEVEL={}", self.compress_level.min(22))),
                _ => {}
            }
        }

        if self.tiled {
            options.push("TILED=YES".to_string());
        }

        options.push("NUM_THREADS=ALL_CPUS".to_string());
        options
    }

    pub fn creation_options(&self) -> RasterCreationOptions {
        RasterCreationOptions::from_iter(self.option_strings())
    }
}

/// Write `data` as a single float32 band at `output_path`.
///
/// Any existing file at the path is removed first. Projection, geotransform
/// and nodata come from `geo_info`; the band description is set to `name`.
pub fn write_index(
    mut data: Buffer<f32>,
    geo_info: &GeoInfo,
    output_path: &Path,
    name: &str,
    options: &WriteOptions,
) -> Result<()> {
    let (width, height) = data.shape();
    if (width, height) != (geo_info.width, geo_info.height) {
        return Err(Error::ShapeMismatch {
            expected: (geo_info.width, geo_info.height),
            found: (width, height),
        });
    }

    if output_path.exists() {
        fs::remove_file(output_path)?;
    }

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut out_ds = driver.create_with_band_type_with_options::<f32, _>(
        output_path,
        width,
        height,
        1,
        &options.creation_options(),
    )?;

    if !geo_info.projection.is_empty() {
        out_ds.set_projection(&geo_info.projection)?;
    }
    if let Some(geo_transform) = &geo_info.geo_transform {
        out_ds.set_geo_transform(geo_transform)?;
    }

    {
        let mut band = out_ds.rasterband(1)?;
        if let Some(nodata) = geo_info.nodata {
            band.set_no_data_value(Some(nodata))?;
        }
        band.set_description(name)?;

        band.write((0, 0), (width, height), &mut data)?;
    }

    out_ds.flush_cache()?;

    info!(
        "{} index has been created and saved to: {}",
        name,
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(
            OutputNaming::Prefixed.file_name("S2_scene", "NDVI"),
            "S2_scene_NDVI.tif"
        );
        assert_eq!(OutputNaming::Plain.file_name("S2_scene", "MSI"), "MSI.tif");
    }

    #[test]
    fn default_creation_options() {
        assert_eq!(
            WriteOptions::default().option_strings(),
            vec!["COMPRESS=DEFLATE", "ZLEVEL=6", "TILED=YES", "NUM_THREADS=ALL_CPUS"]
        );
    }

    #[test]
    fn uncompressed_untiled_options() {
        let options = WriteOptions {
            compress: "none".to_string(),
            compress_level: 3,
            tiled: false,
        };
        assert_eq!(options.option_strings(), vec!["NUM_THREADS=ALL_CPUS"]);
    }

    #[test]
    fn zstd_level_is_clamped() {
        let options = WriteOptions {
            compress: "zstd".to_string(),
            compress_level: 40,
            tiled: true,
        };
        assert_eq!(
            options.option_strings(),
            vec!["COMPRESS=ZSTD", "ZSTD_LEVEL=22", "TILED=YES", "NUM_THREADS=ALL_CPUS"]
        );
    }

    #[test]
    fn shape_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NDVI.tif");
        let geo_info = GeoInfo {
            projection: String::new(),
            geo_transform: None,
            width: 3,
            height: 2,
            nodata: None,
        };

        let data = Buffer::new((2, 2), vec![0.0f32; 4]);
        let result = write_index(data, &geo_info, &path, "NDVI", &WriteOptions::default());
        assert!(matches!(
            result,
            Err(Error::ShapeMismatch {
                expected: (3, 2),
                found: (2, 2)
            })
        ));
        assert!(!path.exists());
    }
}
