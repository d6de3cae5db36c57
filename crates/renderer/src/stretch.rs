//! Robust percentile stretch.
//!
//! The normalization range is taken from the distribution of defined values
//! rather than the extremes, so isolated outliers do not flatten the color
//! ramp.

use serde::{Deserialize, Serialize};

/// Default lower percentile of the stretch.
pub const DEFAULT_LOW_PERCENTILE: f64 = 2.0;

/// Default upper percentile of the stretch.
pub const DEFAULT_HIGH_PERCENTILE: f64 = 98.0;

/// Normalized value used for every defined cell when the range is degenerate.
pub const DEGENERATE_MIDPOINT: f32 = 0.5;

/// Value pair mapped onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRange {
    pub low: f32,
    pub high: f32,
}

impl NormalizationRange {
    /// Build a range, ordering the endpoints.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// True when `high == low`, e.g. for a constant raster.
    pub fn is_degenerate(&self) -> bool {
        self.high <= self.low
    }

    /// Map a value linearly so `low -> 0` and `high -> 1`.
    ///
    /// The result is not clamped. A degenerate range maps every value to
    /// [`DEGENERATE_MIDPOINT`].
    pub fn normalize(&self, value: f32) -> f32 {
        if self.is_degenerate() {
            return DEGENERATE_MIDPOINT;
        }
        (value - self.low) / (self.high - self.low)
    }
}

/// Treatment of defined values that fall outside the normalization range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRange {
    /// Clamp to the ends of the palette
    #[default]
    Clamp,
    /// Render as fully transparent
    Transparent,
}

impl OutOfRange {
    /// Final palette position for a raw normalized value, or `None` when the
    /// cell should be transparent.
    pub fn apply(self, normalized: f32) -> Option<f32> {
        match self {
            OutOfRange::Clamp => Some(normalized.clamp(0.0, 1.0)),
            OutOfRange::Transparent if (0.0..=1.0).contains(&normalized) => Some(normalized),
            OutOfRange::Transparent => None,
        }
    }
}

/// Linearly interpolated percentile of an ascending slice.
///
/// Uses rank `p / 100 * (n - 1)` between the neighbouring order statistics.
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f32], p: f64) -> Option<f32> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f64;

    let lo = sorted[below] as f64;
    let hi = sorted[above.min(last)] as f64;
    Some((lo + (hi - lo) * frac) as f32)
}

/// Percentile range over arbitrary (unsorted) finite values.
///
/// Returns `None` when `values` is empty.
pub fn percentile_range(values: &[f32], low_p: f64, high_p: f64) -> Option<NormalizationRange> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f32::total_cmp);

    let low = percentile(&sorted, low_p)?;
    let high = percentile(&sorted, high_p)?;
    Some(NormalizationRange::new(low, high))
}
