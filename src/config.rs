// src/config.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::io::{OutputNaming, WriteOptions};
use crate::processing::indices::savi::DEFAULT_SOIL_FACTOR;
use crate::processing::indices::{BandRole, SpectralIndex};
use crate::processing::IndexDefinition;

/// Symbolic band name (e.g. `B8`) to 1-based band number in the raster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandMapping(BTreeMap<String, usize>);

impl BandMapping {
    /// Band layout of the stacked 12-band Sentinel-2 product the tool was built for.
    ///
    /// B5 shares number 3 with B3 and B8 sits at 7; kept as the product ships.
    pub fn sentinel2() -> Self {
        Self::from_iter([
            ("B1", 1),
            ("B2", 2),
            ("B3", 3),
            ("B4", 4),
            ("B5", 3),
            ("B6", 5),
            ("B7", 6),
            ("B8", 7),
            ("B8A", 8),
            ("B9", 9),
            ("B10", 10),
            ("B11", 11),
            ("B12", 12),
        ])
    }

    pub fn resolve(&self, key: &str) -> Result<usize> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| Error::BandNotMapped(key.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, band: usize) -> Option<usize> {
        self.0.insert(key.into(), band)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(key, band)| (key.as_str(), *band))
    }
}

impl Default for BandMapping {
    fn default() -> Self {
        Self::sentinel2()
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for BandMapping {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, band)| (key.into(), band)).collect())
    }
}

/// Everything one run needs: input, output location, band layout and which indices to produce
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Entries given in JSON are merged over the Sentinel-2 layout; keys
    /// not listed keep their default band number.
    #[serde(default, deserialize_with = "merge_band_overrides")]
    pub bands: BandMapping,
    #[serde(default = "default_indices")]
    pub indices: Vec<String>,
    #[serde(default)]
    pub naming: OutputNaming,
    /// Band key NDVI reads as red. Both B4 and B3 have been used for this.
    #[serde(default = "default_red_band")]
    pub ndvi_red_band: String,
    #[serde(default = "default_soil_factor")]
    pub soil_factor: f32,
    #[serde(default)]
    pub cache_bands: bool,
    #[serde(default)]
    pub print_stats: bool,
    #[serde(default)]
    pub output: WriteOptions,
}

fn merge_band_overrides<'de, D>(deserializer: D) -> std::result::Result<BandMapping, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, usize>::deserialize(deserializer)?;
    let mut bands = BandMapping::default();
    for (key, band) in overrides {
        bands.insert(key, band);
    }
    Ok(bands)
}

fn default_indices() -> Vec<String> {
    SpectralIndex::ALL
        .iter()
        .map(|index| index.name().to_string())
        .collect()
}

fn default_red_band() -> String {
    BandRole::Red.default_key().to_string()
}

fn default_soil_factor() -> f32 {
    DEFAULT_SOIL_FACTOR
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            bands: BandMapping::default(),
            indices: default_indices(),
            naming: OutputNaming::default(),
            ndvi_red_band: default_red_band(),
            soil_factor: default_soil_factor(),
            cache_bands: false,
            print_stats: false,
            output: WriteOptions::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the index definitions for `indices`, in order, applying the
    /// configured SAVI soil factor and NDVI red band.
    pub fn definitions(&self) -> Result<Vec<IndexDefinition>> {
        self.indices
            .iter()
            .map(|name| self.definition(SpectralIndex::from_name(name)?))
            .collect()
    }

    fn definition(&self, index: SpectralIndex) -> Result<IndexDefinition> {
        match index {
            SpectralIndex::Savi { .. } => Ok(IndexDefinition::new(SpectralIndex::Savi {
                soil_factor: self.soil_factor,
            })),
            SpectralIndex::Ndvi => {
                if self.ndvi_red_band != BandRole::Red.default_key() {
                    warn!(
                        "NDVI red band overridden to {} (other indices keep {})",
                        self.ndvi_red_band,
                        BandRole::Red.default_key()
                    );
                }
                IndexDefinition::with_bands(
                    SpectralIndex::Ndvi,
                    vec![
                        BandRole::Nir.default_key().to_string(),
                        self.ndvi_red_band.clone(),
                    ],
                )
            }
            other => Ok(IndexDefinition::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel2_mapping() {
        let bands = BandMapping::sentinel2();
        assert_eq!(bands.len(), 13);
        assert_eq!(bands.resolve("B8").unwrap(), 7);
        assert_eq!(bands.resolve("B4").unwrap(), 4);
        assert_eq!(bands.resolve("B11").unwrap(), 11);
        assert!(matches!(
            bands.resolve("B13"),
            Err(Error::BandNotMapped(key)) if key == "B13"
        ));
    }

    #[test]
    fn minimal_json_gets_defaults() {
        let config =
            RunConfig::from_json(r#"{ "input": "scene.tif", "output_dir": "out" }"#).unwrap();
        assert_eq!(config, RunConfig::new("scene.tif", "out"));
        assert_eq!(config.indices.len(), 9);
        assert_eq!(config.naming, OutputNaming::Prefixed);
        assert_eq!(config.output.compress, "DEFLATE");
    }

    #[test]
    fn json_overrides() {
        let config = RunConfig::from_json(
            r#"{
                "input": "scene.tif",
                "output_dir": "out",
                "bands": { "B8": 1, "B4": 2 },
                "indices": ["ndvi", "SR"],
                "naming": "plain",
                "ndvi_red_band": "B3",
                "output": { "compress": "LZW", "tiled": false }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bands.len(), 13);
        assert_eq!(config.bands.resolve("B8").unwrap(), 1);
        assert_eq!(config.bands.resolve("B4").unwrap(), 2);
        assert_eq!(config.naming, OutputNaming::Plain);
        assert_eq!(config.output.compress_level, 6);
        assert!(!config.output.tiled);

        let definitions = config.definitions().unwrap();
        let names: Vec<_> = definitions.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["NDVI", "SR"]);
        assert_eq!(definitions[0].bands(), &["B8".to_string(), "B3".to_string()]);
        assert_eq!(definitions[1].bands(), &["B8".to_string(), "B4".to_string()]);
    }

    #[test]
    fn partial_band_overrides_keep_defaults() {
        let config = RunConfig::from_json(
            r#"{ "input": "scene.tif", "output_dir": "out", "bands": { "B8": 8, "B13": 13 } }"#,
        )
        .unwrap();

        assert_eq!(config.bands.len(), 14);
        assert_eq!(config.bands.resolve("B8").unwrap(), 8);
        assert_eq!(config.bands.resolve("B13").unwrap(), 13);
        assert_eq!(config.bands.resolve("B4").unwrap(), 4);
        assert_eq!(config.bands.resolve("B11").unwrap(), 11);
    }

    #[test]
    fn soil_factor_reaches_savi() {
        let mut config = RunConfig::new("scene.tif", "out");
        config.indices = vec!["SAVI".to_string()];
        config.soil_factor = 0.5;

        let definitions = config.definitions().unwrap();
        assert_eq!(
            definitions[0].index(),
            SpectralIndex::Savi { soil_factor: 0.5 }
        );
    }

    #[test]
    fn unknown_index_name_is_rejected() {
        let mut config = RunConfig::new("scene.tif", "out");
        config.indices = vec!["NDVI".to_string(), "FOO".to_string()];
        assert!(matches!(
            config.definitions(),
            Err(Error::UnknownIndex(name)) if name == "FOO"
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            RunConfig::from_json("{ \"input\": 3 }"),
            Err(Error::Config(_))
        ));
    }
}
