//! Affine georeferencing of a raster grid.

use overlay_common::BoundingBox;

/// Six-coefficient affine transform from pixel `(col, row)` to map `(x, y)`.
///
/// Uses the GDAL coefficient order:
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For a north-up grid `pixel_height` is negative and both rotations are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with the top-left corner at `(west, north)`.
    pub fn north_up(west: f64, north: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x: west,
            pixel_width,
            row_rotation: 0.0,
            origin_y: north,
            col_rotation: 0.0,
            pixel_height: -pixel_height.abs(),
        }
    }

    /// Build from the GeoTIFF ModelTiepoint and ModelPixelScale tags.
    ///
    /// Tiepoint format is `[i, j, k, x, y, z]`: raster point `(i, j)` maps to
    /// model point `(x, y)`. Raster rows grow southward, so the pixel scale's
    /// y component is subtracted.
    pub fn from_tiepoint(tiepoint: &[f64], scale: &[f64]) -> Option<Self> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return None;
        }
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        let (scale_x, scale_y) = (scale[0], scale[1]);
        if scale_x == 0.0 || scale_y == 0.0 {
            return None;
        }

        Some(Self {
            origin_x: x - i * scale_x,
            pixel_width: scale_x,
            row_rotation: 0.0,
            origin_y: y + j * scale_y,
            col_rotation: 0.0,
            pixel_height: -scale_y,
        })
    }

    /// Build from the 4x4 row-major GeoTIFF ModelTransformation matrix.
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        let transform = Self {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        };
        // A singular matrix cannot place pixels on the map
        let det = transform.pixel_width * transform.pixel_height
            - transform.row_rotation * transform.col_rotation;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(transform)
    }

    /// Move the origin from the center of pixel `(0, 0)` to its outer corner.
    pub fn pixel_center_to_corner(self) -> Self {
        let (x, y) = self.apply(-0.5, -0.5);
        Self {
            origin_x: x,
            origin_y: y,
            ..self
        }
    }

    /// Map a pixel-corner coordinate to model space.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Extent of a `width` x `height` grid, from all four outer corners.
    pub fn bounds(&self, width: usize, height: usize) -> Option<BoundingBox> {
        let (w, h) = (width as f64, height as f64);
        BoundingBox::from_corners([
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(0.0, h),
            self.apply(w, h),
        ])
    }
}
