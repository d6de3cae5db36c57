//! Colorization of a masked grid into RGBA pixels.

use overlay_common::{OverlayError, OverlayResult};
use tracing::debug;

use crate::palette::{Color, Palette};
use crate::stretch::{
    percentile_range, NormalizationRange, OutOfRange, DEFAULT_HIGH_PERCENTILE,
    DEFAULT_LOW_PERCENTILE,
};

/// Stretch parameters for [`colorize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorizeOptions {
    pub out_of_range: OutOfRange,
    pub low_percentile: f64,
    pub high_percentile: f64,
}

impl Default for ColorizeOptions {
    fn default() -> Self {
        Self {
            out_of_range: OutOfRange::Clamp,
            low_percentile: DEFAULT_LOW_PERCENTILE,
            high_percentile: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

/// RGBA pixels for a grid, same dimensions and row order as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorizedImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// `None` when the grid had no defined cells
    pub range: Option<NormalizationRange>,
    pub defined_cells: usize,
}

impl ColorizedImage {
    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        self.pixels
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Colorize `data` (row-major, `width * height`) with `palette`.
///
/// Cells rejected by `is_defined` become fully transparent and are excluded
/// from the percentile computation. When no cell is defined the whole image
/// is transparent.
pub fn colorize<F>(
    data: &[f32],
    width: usize,
    height: usize,
    is_defined: F,
    palette: &Palette,
    options: &ColorizeOptions,
) -> OverlayResult<ColorizedImage>
where
    F: Fn(f32) -> bool,
{
    if width == 0 || height == 0 {
        return Err(OverlayError::processing("grid has zero width or height"));
    }
    if data.len() != width * height {
        return Err(OverlayError::processing(format!(
            "grid holds {} cells, expected {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let defined: Vec<f32> = data.iter().copied().filter(|&v| is_defined(v)).collect();
    let range = percentile_range(&defined, options.low_percentile, options.high_percentile);

    match range {
        Some(r) => debug!(
            defined = defined.len(),
            low = r.low,
            high = r.high,
            degenerate = r.is_degenerate(),
            "Computed stretch range"
        ),
        None => debug!(cells = data.len(), "Grid has no defined cells"),
    }

    let mut pixels = vec![0u8; data.len() * 4];
    if let Some(range) = range {
        for (value, out) in data.iter().zip(pixels.chunks_exact_mut(4)) {
            if !is_defined(*value) {
                continue;
            }
            let color = options
                .out_of_range
                .apply(range.normalize(*value))
                .map(|t| palette.sample(t))
                .unwrap_or_else(Color::transparent);
            out.copy_from_slice(&color.to_rgba());
        }
    }

    Ok(ColorizedImage {
        pixels,
        width,
        height,
        range,
        defined_cells: defined.len(),
    })
}
