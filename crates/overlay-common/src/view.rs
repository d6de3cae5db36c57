//! Map view configuration supplied by the UI each render pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{OverlayError, OverlayResult};

/// Lowest zoom level accepted by the map view.
pub const MIN_ZOOM: u8 = 1;

/// Highest zoom level accepted by the map view.
pub const MAX_ZOOM: u8 = 18;

/// Default zoom level of the initial view.
pub const DEFAULT_ZOOM: u8 = 11;

/// Properties of the most recently selected map feature, passed through
/// for display without interpretation.
pub type FeatureProperties = BTreeMap<String, serde_json::Value>;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Named starting locations offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPreset {
    Brazil,
    London,
    Tokyo,
}

impl LocationPreset {
    pub fn center(&self) -> LatLon {
        match self {
            LocationPreset::Brazil => LatLon::new(-38.7785, -15.9930),
            LocationPreset::London => LatLon::new(51.5074, -0.1278),
            LocationPreset::Tokyo => LatLon::new(35.6762, 139.6503),
        }
    }

    /// Parse a preset name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "brazil" => Some(LocationPreset::Brazil),
            "london" => Some(LocationPreset::London),
            "tokyo" => Some(LocationPreset::Tokyo),
            _ => None,
        }
    }
}

/// The base tile layer drawn underneath all overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    /// XYZ tile URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
}

impl Default for BaseLayer {
    fn default() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }
}

/// Initial view of the map. Independent of any overlay's bounds: the view is
/// never auto-fit to the rendered layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewConfig {
    pub center: LatLon,
    pub zoom: u8,
    #[serde(default)]
    pub base_layer: BaseLayer,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LocationPreset::Brazil.center(),
            zoom: DEFAULT_ZOOM,
            base_layer: BaseLayer::default(),
        }
    }
}

impl MapViewConfig {
    pub fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            base_layer: BaseLayer::default(),
        }
    }

    /// Validate zoom and center ranges.
    pub fn validate(&self) -> OverlayResult<()> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(OverlayError::config(format!(
                "zoom {} is outside [{}, {}]",
                self.zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if !(-90.0..=90.0).contains(&self.center.lat) {
            return Err(OverlayError::config(format!(
                "latitude {} is outside [-90, 90]",
                self.center.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.center.lon) {
            return Err(OverlayError::config(format!(
                "longitude {} is outside [-180, 180]",
                self.center.lon
            )));
        }
        Ok(())
    }
}
