//! Raster dataset access.
//!
//! Reads single-band GeoTIFF files into a row-major `f32` grid together with
//! the affine georeferencing and optional no-data sentinel needed to place
//! the grid on a map.
//!
//! ```no_run
//! use raster_source::RasterDataset;
//!
//! let dataset = RasterDataset::open("data/EMwmeanByROC_reclass.tif")?;
//! let bounds = dataset.bounds();
//! println!("{}x{} covering {:?}", dataset.width(), dataset.height(), bounds);
//! # Ok::<(), overlay_common::OverlayError>(())
//! ```

mod dataset;
mod geotiff;
mod transform;

pub use dataset::RasterDataset;
pub use geotiff::read_geotiff;
pub use transform::GeoTransform;
