//! Common types shared across the raster overlay crates.

pub mod bbox;
pub mod error;
pub mod layer;
pub mod view;

pub use bbox::BoundingBox;
pub use error::{OverlayError, OverlayResult};
pub use layer::LayerConfig;
pub use view::{BaseLayer, FeatureProperties, LatLon, LocationPreset, MapViewConfig};
