//! Palette registry.
//!
//! Maps a fixed set of palette identifiers to continuous color ramps over
//! `[0, 1]`. Ramps are piecewise-linear between 8-bit color stops sampled
//! from the matplotlib colormaps of the same name.

use overlay_common::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A color pinned to a position in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

const fn stop(position: f32, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        position,
        color: Color::rgb(r, g, b),
    }
}

const VIRIDIS: &[ColorStop] = &[
    stop(0.0, 0x44, 0x01, 0x54),
    stop(0.1, 0x48, 0x24, 0x75),
    stop(0.2, 0x41, 0x44, 0x87),
    stop(0.3, 0x35, 0x5f, 0x8d),
    stop(0.4, 0x2a, 0x78, 0x8e),
    stop(0.5, 0x21, 0x91, 0x8c),
    stop(0.6, 0x22, 0xa8, 0x84),
    stop(0.7, 0x44, 0xbf, 0x70),
    stop(0.8, 0x7a, 0xd1, 0x51),
    stop(0.9, 0xbd, 0xdf, 0x26),
    stop(1.0, 0xfd, 0xe7, 0x25),
];

const PLASMA: &[ColorStop] = &[
    stop(0.0, 0x0d, 0x08, 0x87),
    stop(0.1, 0x41, 0x04, 0x9d),
    stop(0.2, 0x6a, 0x00, 0xa8),
    stop(0.3, 0x8f, 0x0d, 0xa4),
    stop(0.4, 0xb1, 0x2a, 0x90),
    stop(0.5, 0xcc, 0x47, 0x78),
    stop(0.6, 0xe1, 0x64, 0x62),
    stop(0.7, 0xf2, 0x84, 0x4b),
    stop(0.8, 0xfc, 0xa6, 0x36),
    stop(0.9, 0xfc, 0xce, 0x25),
    stop(1.0, 0xf0, 0xf9, 0x21),
];

const MAGMA: &[ColorStop] = &[
    stop(0.0, 0x00, 0x00, 0x04),
    stop(0.1, 0x14, 0x0e, 0x36),
    stop(0.2, 0x3b, 0x0f, 0x70),
    stop(0.3, 0x64, 0x1a, 0x80),
    stop(0.4, 0x8c, 0x29, 0x81),
    stop(0.5, 0xb7, 0x37, 0x79),
    stop(0.6, 0xde, 0x49, 0x68),
    stop(0.7, 0xf7, 0x70, 0x5c),
    stop(0.8, 0xfe, 0x9f, 0x6d),
    stop(0.9, 0xfe, 0xcf, 0x92),
    stop(1.0, 0xfc, 0xfd, 0xbf),
];

// Segment data of matplotlib's "terrain": water, lowland, highland, peaks
const TERRAIN: &[ColorStop] = &[
    stop(0.0, 51, 51, 153),
    stop(0.15, 0, 153, 255),
    stop(0.25, 0, 204, 102),
    stop(0.5, 255, 255, 153),
    stop(0.75, 128, 92, 84),
    stop(1.0, 255, 255, 255),
];

const GREYS: &[ColorStop] = &[stop(0.0, 255, 255, 255), stop(1.0, 0, 0, 0)];

/// Registered palette identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteId {
    /// Perceptually uniform sequential (default)
    Viridis,
    Plasma,
    Magma,
    /// Hypsometric ramp from water blue through green and brown to white
    Terrain,
    /// White to black
    Greys,
}

impl PaletteId {
    /// Every registered identifier.
    pub fn all() -> &'static [PaletteId] {
        &[
            PaletteId::Viridis,
            PaletteId::Plasma,
            PaletteId::Magma,
            PaletteId::Terrain,
            PaletteId::Greys,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaletteId::Viridis => "viridis",
            PaletteId::Plasma => "plasma",
            PaletteId::Magma => "magma",
            PaletteId::Terrain => "terrain",
            PaletteId::Greys => "greys",
        }
    }

    fn stops(&self) -> &'static [ColorStop] {
        match self {
            PaletteId::Viridis => VIRIDIS,
            PaletteId::Plasma => PLASMA,
            PaletteId::Magma => MAGMA,
            PaletteId::Terrain => TERRAIN,
            PaletteId::Greys => GREYS,
        }
    }
}

impl fmt::Display for PaletteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaletteId {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PaletteId::all()
            .iter()
            .copied()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = PaletteId::all().iter().map(|id| id.name()).collect();
                OverlayError::config(format!(
                    "unknown palette '{}' (registered: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// A resolved continuous color ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    id: PaletteId,
    stops: &'static [ColorStop],
}

impl Palette {
    pub fn new(id: PaletteId) -> Self {
        Self {
            id,
            stops: id.stops(),
        }
    }

    pub fn id(&self) -> PaletteId {
        self.id
    }

    /// Color for a normalized value.
    ///
    /// Pure and deterministic. Inputs are clamped to `[0, 1]` (NaN maps to 0);
    /// callers decide out-of-range behavior before sampling.
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        for pair in self.stops.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if t <= high.position {
                let span = high.position - low.position;
                let local = if span > 0.0 {
                    (t - low.position) / span
                } else {
                    0.0
                };
                return interpolate_color(low.color, high.color, local);
            }
        }

        self.stops
            .last()
            .map(|s| s.color)
            .unwrap_or_else(Color::transparent)
    }

    /// The palette as a plain function of the normalized value.
    pub fn as_fn(&self) -> impl Fn(f32) -> Color + '_ {
        move |t| self.sample(t)
    }
}

/// Resolve a palette identifier; unknown names are configuration errors.
pub fn resolve(name: &str) -> OverlayResult<Palette> {
    Ok(Palette::new(name.parse()?))
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_are_ascending_and_span_unit_interval() {
        for id in PaletteId::all() {
            let stops = id.stops();
            assert_eq!(stops.first().unwrap().position, 0.0, "{}", id);
            assert_eq!(stops.last().unwrap().position, 1.0, "{}", id);
            for pair in stops.windows(2) {
                assert!(pair[0].position < pair[1].position, "{} stops out of order", id);
            }
        }
    }

    #[test]
    fn test_interpolate_color_midpoint() {
        let mid = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_sample_hits_stops_exactly() {
        let terrain = Palette::new(PaletteId::Terrain);
        assert_eq!(terrain.sample(0.25), Color::rgb(0, 204, 102));
        assert_eq!(terrain.sample(1.0), Color::rgb(255, 255, 255));
    }
}
