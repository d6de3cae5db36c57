//! Raster processing and layer composition.
//!
//! [`LayerCompositor::render`] runs one pass: every active [`LayerConfig`]
//! is turned into a PNG overlay by the [`RasterProcessor`], handed to a
//! [`MapView`], and cleaned up once the view has consumed it.
//!
//! ```no_run
//! use compositor::{ArtifactStore, InMemoryMapView, LayerCompositor, RasterProcessor};
//! use overlay_common::{LayerConfig, MapViewConfig};
//!
//! let compositor = LayerCompositor::new(RasterProcessor::default(), ArtifactStore::in_temp_dir());
//! let mut view = InMemoryMapView::new(MapViewConfig::default());
//! let layers = vec![LayerConfig::new("Elevation", "data/dem.tif", "terrain", 0.7, true)];
//!
//! for outcome in compositor.render(layers, &mut view) {
//!     println!("{}: {}", outcome.name(), outcome.is_success());
//! }
//! ```
//!
//! [`LayerConfig`]: overlay_common::LayerConfig

pub mod artifact;
pub mod compositor;
pub mod map_view;
pub mod processor;

pub use artifact::{ArtifactPass, ArtifactStore, ImageArtifact};
pub use compositor::{
    summarize_outcomes, LayerCompositor, LayerFailure, LayerOutcome, ProcessedOverlay,
    RenderedLayer,
};
pub use map_view::{DisplayedOverlay, InMemoryMapView, MapView};
pub use processor::{
    EncodedRaster, LayerProcessor, ProcessedRaster, ProcessorOptions, RasterProcessor,
};
