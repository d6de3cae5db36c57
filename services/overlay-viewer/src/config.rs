//! Viewer configuration.
//!
//! Loaded from a YAML file, then overridden by environment variables and
//! finally by command-line flags.

use anyhow::{bail, Context, Result};
use compositor::ProcessorOptions;
use overlay_common::view::DEFAULT_ZOOM;
use overlay_common::{LatLon, LayerConfig, LocationPreset, MapViewConfig, OverlayResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "OVERLAY_DATA_DIR";

/// Environment variable overriding `artifact_dir`.
pub const ARTIFACT_DIR_ENV: &str = "OVERLAY_ARTIFACT_DIR";

/// Dataset shipped with the default layers.
pub const DEFAULT_DATASET: &str = "EMwmeanByROC_reclass.tif";

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Page title
    pub title: String,

    /// Named starting location, used unless `center` is set
    pub location: Option<LocationPreset>,

    /// Custom map center
    pub center: Option<LatLon>,

    pub zoom: u8,

    /// Base directory for relative layer sources
    pub data_dir: PathBuf,

    /// Where render passes write their temporary images
    /// (defaults to a directory under the system temp dir)
    pub artifact_dir: Option<PathBuf>,

    /// Stretch settings
    #[serde(flatten)]
    pub processing: ProcessorOptions,

    /// Layers in drawing order
    pub layers: Vec<LayerConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Interactive MAP Sun Coral Modelling".to_string(),
            location: Some(LocationPreset::Brazil),
            center: None,
            zoom: DEFAULT_ZOOM,
            data_dir: PathBuf::from("data"),
            artifact_dir: None,
            processing: ProcessorOptions::default(),
            layers: vec![
                LayerConfig::new("Satellite Imagery", DEFAULT_DATASET, "viridis", 0.8, true),
                LayerConfig::new("Elevation", DEFAULT_DATASET, "terrain", 0.7, false),
            ],
        }
    }
}

impl ViewerConfig {
    /// Load from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `OVERLAY_DATA_DIR` and `OVERLAY_ARTIFACT_DIR` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ARTIFACT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.artifact_dir = Some(PathBuf::from(dir));
        }
    }

    /// Switch a configured layer on or off by name.
    pub fn set_layer_active(&mut self, name: &str, active: bool) -> Result<()> {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.active = active;
                Ok(())
            }
            None => {
                let known: Vec<&str> = self.layers.iter().map(|l| l.name.as_str()).collect();
                bail!("no layer named '{}' (configured: {})", name, known.join(", "))
            }
        }
    }

    /// Effective map center: custom center, else the preset, else Brazil.
    pub fn effective_center(&self) -> LatLon {
        self.center
            .or_else(|| self.location.map(|l| l.center()))
            .unwrap_or_else(|| LocationPreset::Brazil.center())
    }

    /// Validated map view settings.
    pub fn map_view_config(&self) -> OverlayResult<MapViewConfig> {
        let view = MapViewConfig::new(self.effective_center(), self.zoom);
        view.validate()?;
        Ok(view)
    }

    /// The layer list for one pass, with relative sources resolved against
    /// `data_dir`.
    pub fn resolved_layers(&self) -> Vec<LayerConfig> {
        self.layers
            .iter()
            .map(|layer| {
                let mut layer = layer.clone();
                if layer.source.is_relative() {
                    layer.source = self.data_dir.join(&layer.source);
                }
                layer
            })
            .collect()
    }
}
