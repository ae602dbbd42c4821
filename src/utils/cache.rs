// src/utils/cache.rs
use std::collections::HashMap;

use gdal::raster::Buffer;
use parking_lot::Mutex;

use crate::error::Result;

/// In-memory cache of band arrays already read from one raster, keyed by band number
pub struct BandCache {
    bands: Mutex<HashMap<usize, ((usize, usize), Vec<f32>)>>,
}

impl BandCache {
    pub fn new() -> Self {
        Self {
            bands: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached copy of `band`, calling `read` and keeping its result on a miss
    pub fn get_or_read<F>(&self, band: usize, read: F) -> Result<Buffer<f32>>
    where
        F: FnOnce() -> Result<Buffer<f32>>,
    {
        if let Some((shape, data)) = self.bands.lock().get(&band) {
            return Ok(Buffer::new(*shape, data.clone()));
        }

        // Not in cache, read and add it
        let buffer = read()?;
        self.bands
            .lock()
            .insert(band, (buffer.shape(), buffer.data().to_vec()));

        Ok(buffer)
    }

    pub fn contains(&self, band: usize) -> bool {
        self.bands.lock().contains_key(&band)
    }

    pub fn clear(&self) {
        self.bands.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.bands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BandCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_read_is_served_from_cache() {
        let cache = BandCache::new();
        let mut reads = 0;

        let first = cache
            .get_or_read(3, || {
                reads += 1;
                Ok(Buffer::new((2, 1), vec![1.0, 2.0]))
            })
            .unwrap();
        assert_eq!(first.data(), &[1.0, 2.0]);

        let second = cache
            .get_or_read(3, || {
                reads += 1;
                Ok(Buffer::new((2, 1), vec![9.0, 9.0]))
            })
            .unwrap();
        assert_eq!(second.data(), &[1.0, 2.0]);
        assert_eq!(second.shape(), (2, 1));
        assert_eq!(reads, 1);
        assert!(cache.contains(3));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_read_is_not_cached() {
        let cache = BandCache::new();
        let result = cache.get_or_read(1, || {
            Err(crate::error::Error::BandOutOfRange { band: 1, count: 0 })
        });
        assert!(result.is_err());
        assert!(!cache.contains(1));
    }
}
