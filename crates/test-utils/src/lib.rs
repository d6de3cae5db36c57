//! Shared test utilities for the raster overlay workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic grid generators
//! - A minimal GeoTIFF writer for building test datasets on disk
//! - Common fixtures (extents, sentinels, layer names)
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{ramp_grid, GeoTiffSpec};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = GeoTiffSpec::new(10, 10, ramp_grid(10, 10)).write_to(dir.path(), "ramp.tif");
//! ```

pub mod fixtures;
pub mod generators;
pub mod geotiff;

pub use fixtures::*;
pub use generators::*;
pub use geotiff::GeoTiffSpec;
