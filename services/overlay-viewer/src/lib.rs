//! Static map viewer for raster overlays.
//!
//! Reads a YAML view configuration, runs a render pass through the layer
//! compositor and writes the result as a Leaflet page.

pub mod config;
pub mod diagnostics;
pub mod html_view;

pub use config::ViewerConfig;
pub use diagnostics::DataDirReport;
pub use html_view::HtmlMapView;
