//! Image rendering for raster overlays.
//!
//! - Palette registry (named continuous color ramps)
//! - Robust percentile stretch
//! - Colorization of masked grids into RGBA pixels
//! - PNG encoding

pub mod colorize;
pub mod palette;
pub mod png;
pub mod stretch;

pub use colorize::{colorize, ColorizeOptions, ColorizedImage};
pub use palette::{resolve, Color, Palette, PaletteId};
pub use stretch::{NormalizationRange, OutOfRange};
