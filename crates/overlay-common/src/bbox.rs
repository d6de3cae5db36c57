//! Geographic bounding box of a rendered overlay.

use serde::{Deserialize, Serialize};

/// A geographic extent in degrees.
///
/// Fields follow the `(south, west, north, east)` order used by web map
/// overlays. Boxes built through [`BoundingBox::from_corners`] always satisfy
/// `south <= north` and `west <= east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges, as given.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box containing every `(x, y)` corner, where `x` is the
    /// longitude/easting and `y` the latitude/northing.
    ///
    /// Returns `None` for an empty iterator or when any coordinate is not finite.
    pub fn from_corners<I>(corners: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bbox: Option<BoundingBox> = None;
        for (x, y) in corners {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            bbox = Some(match bbox {
                None => BoundingBox::new(y, x, y, x),
                Some(b) => BoundingBox::new(
                    b.south.min(y),
                    b.west.min(x),
                    b.north.max(y),
                    b.east.max(x),
                ),
            });
        }
        bbox
    }

    /// True when `south <= north` and `west <= east`.
    pub fn is_ordered(&self) -> bool {
        self.south <= self.north && self.west <= self.east
    }

    /// East-west extent in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// North-south extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center of the box as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox (edges included).
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Corner pair `[[south, west], [north, east]]` as expected by Leaflet's
    /// `L.imageOverlay`.
    pub fn to_leaflet_bounds(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}
