//! In-memory view of a single-band raster.

use overlay_common::{BoundingBox, OverlayError, OverlayResult};
use std::path::Path;

use crate::GeoTransform;

/// A georeferenced single-band raster grid.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    /// Sample values in row-major order (row 0 is the first raster row,
    /// which is the northern edge for north-up grids).
    data: Vec<f32>,
    width: usize,
    height: usize,
    /// Cells equal to this value carry no measurement.
    nodata: Option<f64>,
    transform: GeoTransform,
    bounds: BoundingBox,
}

impl RasterDataset {
    /// Build a dataset from an already decoded grid.
    ///
    /// Fails with a processing error when `data` does not hold exactly
    /// `width * height` samples or the transform cannot produce finite bounds.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        nodata: Option<f64>,
        transform: GeoTransform,
    ) -> OverlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::processing(format!(
                "raster has empty shape {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(OverlayError::processing(format!(
                "band holds {} samples, expected {}x{} = {}",
                data.len(),
                width,
                height,
                width * height
            )));
        }
        let bounds = transform.bounds(width, height).ok_or_else(|| {
            OverlayError::processing("georeferencing produces non-finite bounds")
        })?;

        Ok(Self {
            data,
            width,
            height,
            nodata,
            transform,
            bounds,
        })
    }

    /// Open a GeoTIFF file.
    pub fn open<P: AsRef<Path>>(path: P) -> OverlayResult<Self> {
        crate::read_geotiff(path.as_ref())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major sample values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Geographic extent of the whole grid, independent of pixel resolution.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Sample at `(col, row)`, or `None` outside the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Whether a sample holds a measurement.
    ///
    /// Non-finite samples and samples equal to the no-data sentinel (compared
    /// at the grid's `f32` precision) are undefined.
    pub fn is_defined(&self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.nodata {
            Some(nodata) => value != nodata as f32,
            None => true,
        }
    }

    /// Values of every defined cell, in grid order.
    pub fn defined_values(&self) -> Vec<f32> {
        self.data
            .iter()
            .copied()
            .filter(|&v| self.is_defined(v))
            .collect()
    }

    /// Number of cells that carry a measurement.
    pub fn defined_count(&self) -> usize {
        self.data.iter().filter(|&&v| self.is_defined(v)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> GeoTransform {
        GeoTransform::north_up(0.0, 2.0, 1.0, 1.0)
    }

    #[test]
    fn test_shape_mismatch_is_processing_error() {
        let result = RasterDataset::new(vec![1.0; 5], 2, 2, None, transform());
        assert!(matches!(result, Err(OverlayError::Processing(_))));
    }

    #[test]
    fn test_nodata_and_nan_are_undefined() {
        let ds = RasterDataset::new(
            vec![1.0, -9999.0, f32::NAN, 4.0],
            2,
            2,
            Some(-9999.0),
            transform(),
        )
        .unwrap();
        assert_eq!(ds.defined_values(), vec![1.0, 4.0]);
        assert_eq!(ds.defined_count(), 2);
    }

    #[test]
    fn test_get_out_of_grid() {
        let ds = RasterDataset::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, None, transform()).unwrap();
        assert_eq!(ds.get(1, 1), Some(4.0));
        assert_eq!(ds.get(2, 0), None);
    }
}
