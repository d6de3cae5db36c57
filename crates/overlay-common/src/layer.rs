//! Per-pass layer configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{OverlayError, OverlayResult};

/// Configuration of one overlay layer for a single render pass.
///
/// Built fresh from the UI state every pass and handed to the compositor by
/// value; it has no identity beyond that pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Display name, also used in the layer control
    pub name: String,

    /// Path to the raster dataset
    pub source: PathBuf,

    /// Palette identifier (see the renderer's palette registry)
    #[serde(default = "default_palette")]
    pub palette: String,

    /// Overlay opacity in [0, 1]
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Whether the layer is drawn this pass
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_palette() -> String {
    "viridis".to_string()
}

fn default_opacity() -> f32 {
    1.0
}

fn default_active() -> bool {
    true
}

impl LayerConfig {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        palette: impl Into<String>,
        opacity: f32,
        active: bool,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            palette: palette.into(),
            opacity,
            active,
        }
    }

    /// Source path as shown in user-facing messages.
    pub fn source_display(&self) -> String {
        self.source.display().to_string()
    }

    /// Check the values that do not depend on the palette registry.
    ///
    /// The palette name is only checked for emptiness here. Whether it names
    /// a registered palette is decided when the layer is processed, which
    /// fails the layer with the same `Config` error.
    pub fn validate(&self) -> OverlayResult<()> {
        if self.name.trim().is_empty() {
            return Err(OverlayError::config("layer name must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(OverlayError::config(format!(
                "opacity {} for layer '{}' is outside [0, 1]",
                self.opacity, self.name
            )));
        }
        if self.palette.trim().is_empty() {
            return Err(OverlayError::config(format!(
                "layer '{}' has no palette",
                self.name
            )));
        }
        Ok(())
    }
}
