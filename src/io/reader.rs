// src/io/reader.rs
use gdal::raster::Buffer;
use gdal::Dataset;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::BandCache;

/// Georeferencing carried from the source raster to every output
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    pub projection: String,
    pub geo_transform: Option<[f64; 6]>,
    pub width: usize,
    pub height: usize,
    /// Nodata value of the first source band, if any
    pub nodata: Option<f64>,
}

/// An open multi-band raster. Bands are read whole, one at a time.
pub struct Raster {
    dataset: Dataset,
    base_name: String,
    band_count: usize,
    geo_info: GeoInfo,
    cache: Option<BandCache>,
}

impl Raster {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::open(path)?;
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "raster".to_string());

        Self::from_dataset(dataset, base_name)
    }

    /// Wrap an already opened dataset, e.g. one from the `MEM` driver
    pub fn from_dataset(dataset: Dataset, base_name: impl Into<String>) -> Result<Self> {
        let (width, height) = dataset.raster_size();
        let band_count = dataset.raster_count() as usize;
        let projection = dataset.projection();
        let geo_transform = dataset.geo_transform().ok();
        let nodata = if band_count > 0 {
            dataset.rasterband(1)?.no_data_value()
        } else {
            None
        };

        debug!(width, height, band_count, "opened raster");

        Ok(Self {
            dataset,
            base_name: base_name.into(),
            band_count,
            geo_info: GeoInfo {
                projection,
                geo_transform,
                width,
                height,
                nodata,
            },
            cache: None,
        })
    }

    /// Keep every band in memory after its first read
    pub fn with_band_cache(mut self) -> Self {
        self.cache = Some(BandCache::new());
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Pixel size as (width, height)
    pub fn size(&self) -> (usize, usize) {
        (self.geo_info.width, self.geo_info.height)
    }

    pub fn geo_info(&self) -> &GeoInfo {
        &self.geo_info
    }

    pub fn cached_bands(&self) -> usize {
        self.cache.as_ref().map_or(0, BandCache::len)
    }

    /// Read a whole band (1-based) as float32
    pub fn read_band(&self, band_number: usize) -> Result<Buffer<f32>> {
        if band_number == 0 || band_number > self.band_count {
            return Err(Error::BandOutOfRange {
                band: band_number,
                count: self.band_count,
            });
        }

        match &self.cache {
            Some(cache) => cache.get_or_read(band_number, || self.read_from_dataset(band_number)),
            None => self.read_from_dataset(band_number),
        }
    }

    fn read_from_dataset(&self, band_number: usize) -> Result<Buffer<f32>> {
        debug!(band = band_number, "reading band");
        let band = self.dataset.rasterband(band_number)?;
        let size = self.size();
        let buffer = band.read_as::<f32>((0, 0), size, size, None)?;
        Ok(buffer)
    }
}
