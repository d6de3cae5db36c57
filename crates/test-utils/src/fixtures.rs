//! Common test fixtures for the overlay pipeline.

/// Common extents as `(south, west, north, east)`.
pub mod extent {
    /// Coastal study area off Brazil, matching the default map center
    pub const BRAZIL_COAST: (f64, f64, f64, f64) = (-40.0, -17.0, -38.0, -15.0);

    /// Small extent around London
    pub const LONDON: (f64, f64, f64, f64) = (51.0, -1.0, 52.0, 0.5);

    /// Whole world
    pub const GLOBAL: (f64, f64, f64, f64) = (-90.0, -180.0, 90.0, 180.0);
}

/// No-data sentinels seen in real rasters.
pub mod nodata {
    /// Common GDAL default for float rasters
    pub const FLOAT_DEFAULT: f64 = -9999.0;

    /// Typical sentinel for 8-bit classified rasters
    pub const BYTE_DEFAULT: f64 = 255.0;
}

/// Layer names used by the default view.
pub mod layers {
    pub const SATELLITE: &str = "Satellite Imagery";
    pub const ELEVATION: &str = "Elevation";
}

/// Palette identifiers registered by the renderer.
pub mod palettes {
    pub const VIRIDIS: &str = "viridis";
    pub const TERRAIN: &str = "terrain";
}
