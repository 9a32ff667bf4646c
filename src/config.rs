//! Configuration Management

use meshtrc_algorithms::FootAnchors;
use meshtrc_core::{Error, MarkerVertexMap, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a conversion run needs besides the input paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Frame rate the mesh frames were produced at (Hz)
    pub sampling_rate: f64,
    /// Re-express markers in the foot-referenced floor frame
    pub align_to_floor: bool,
    /// Name of the folders holding estimator output (e.g. "CameraHMR")
    pub search_tag: String,
    /// Prefix of the output folder that replaces the search tag folder
    pub output_prefix: String,
    /// Convert trials of a batch in parallel
    pub parallel: bool,
    /// Markers used to build the floor frame
    pub anchors: FootAnchors,
    /// Marker names and vertex indices, in output column order
    pub markers: MarkerVertexMap,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 60.0,
            align_to_floor: false,
            search_tag: "CameraHMR".to_string(),
            output_prefix: "MarkerData_".to_string(),
            parallel: true,
            anchors: FootAnchors::default(),
            markers: MarkerVertexMap::smpl_default(),
        }
    }
}

impl ConverterConfig {
    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !(self.sampling_rate.is_finite() && self.sampling_rate > 0.0) {
            return Err(Error::Config(format!(
                "sampling_rate must be a positive number, got {}",
                self.sampling_rate
            )));
        }
        if self.markers.is_empty() {
            return Err(Error::Config("At least one marker must be configured".to_string()));
        }
        if self.search_tag.trim().is_empty() {
            return Err(Error::Config("search_tag must not be empty".to_string()));
        }
        Ok(())
    }
}
