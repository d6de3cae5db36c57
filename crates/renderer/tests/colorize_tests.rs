//! Tests for stretch and colorization.

use approx::assert_relative_eq;
use renderer::palette::{Palette, PaletteId};
use renderer::stretch::percentile_range;
use renderer::{colorize, ColorizeOptions, OutOfRange};

fn finite(v: f32) -> bool {
    v.is_finite()
}

fn ramp(n: usize) -> Vec<f32> {
    (0..n).map(|i| i as f32).collect()
}

// ============================================================================
// Percentile range
// ============================================================================

#[test]
fn test_percentile_range_on_ramp_0_to_99() {
    let range = percentile_range(&ramp(100), 2.0, 98.0).unwrap();
    assert_relative_eq!(range.low, 1.98, epsilon = 1e-4);
    assert_relative_eq!(range.high, 97.02, epsilon = 1e-4);
}

#[test]
fn test_percentile_range_ignores_input_order() {
    let mut shuffled = ramp(100);
    shuffled.reverse();
    shuffled.swap(3, 71);
    assert_eq!(
        percentile_range(&shuffled, 2.0, 98.0),
        percentile_range(&ramp(100), 2.0, 98.0)
    );
}

#[test]
fn test_outliers_do_not_stretch_range() {
    let mut values = ramp(100);
    values[0] = -1.0e6;
    values[99] = 1.0e6;
    let range = percentile_range(&values, 2.0, 98.0).unwrap();
    assert!(range.low > 0.0 && range.low < 3.0);
    assert!(range.high > 96.0 && range.high < 99.0);
}

// ============================================================================
// Colorize
// ============================================================================

#[test]
fn test_undefined_cells_are_fully_transparent() {
    let mut data = ramp(16);
    data[3] = -9999.0;
    data[10] = f32::NAN;

    let image = colorize(
        &data,
        4,
        4,
        |v| v.is_finite() && v != -9999.0,
        &Palette::new(PaletteId::Viridis),
        &ColorizeOptions::default(),
    )
    .unwrap();

    assert_eq!(image.defined_cells, 14);
    assert_eq!(image.pixel(3, 0), Some([0, 0, 0, 0]));
    assert_eq!(image.pixel(2, 2), Some([0, 0, 0, 0]));
    for (i, px) in image.pixels.chunks_exact(4).enumerate() {
        if i != 3 && i != 10 {
            assert_eq!(px[3], 255, "cell {} should be opaque", i);
        }
    }
}

#[test]
fn test_constant_grid_uses_palette_midpoint() {
    let palette = Palette::new(PaletteId::Viridis);
    let image = colorize(&[42.0; 9], 3, 3, finite, &palette, &ColorizeOptions::default()).unwrap();

    let range = image.range.unwrap();
    assert!(range.is_degenerate());
    let expected = palette.sample(0.5).to_rgba();
    assert!(image.pixels.chunks_exact(4).all(|px| px == expected));
}

#[test]
fn test_all_undefined_grid_is_transparent() {
    let image = colorize(
        &[f32::NAN; 4],
        2,
        2,
        finite,
        &Palette::new(PaletteId::Magma),
        &ColorizeOptions::default(),
    )
    .unwrap();

    assert_eq!(image.range, None);
    assert_eq!(image.defined_cells, 0);
    assert!(image.pixels.iter().all(|&b| b == 0));
}

#[test]
fn test_clamp_maps_extremes_to_palette_ends() {
    let palette = Palette::new(PaletteId::Greys);
    let image = colorize(&ramp(100), 10, 10, finite, &palette, &ColorizeOptions::default()).unwrap();

    assert_eq!(image.pixel(0, 0), Some(palette.sample(0.0).to_rgba()));
    assert_eq!(image.pixel(9, 9), Some(palette.sample(1.0).to_rgba()));
}

#[test]
fn test_transparent_policy_hides_out_of_range_cells() {
    let options = ColorizeOptions {
        out_of_range: OutOfRange::Transparent,
        ..ColorizeOptions::default()
    };
    let image = colorize(
        &ramp(100),
        10,
        10,
        finite,
        &Palette::new(PaletteId::Greys),
        &options,
    )
    .unwrap();

    // 0 and 1 fall below 1.98, 98 and 99 above 97.02
    let hidden: Vec<usize> = image
        .pixels
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] == 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(hidden, vec![0, 1, 98, 99]);
}

#[test]
fn test_output_follows_row_order() {
    let palette = Palette::new(PaletteId::Greys);
    let image = colorize(&ramp(100), 10, 10, finite, &palette, &ColorizeOptions::default()).unwrap();

    // greys darkens with value, so the first row is lighter than the last
    let top = image.pixel(5, 0).unwrap()[0];
    let bottom = image.pixel(5, 9).unwrap()[0];
    assert!(top > bottom);
}

#[test]
fn test_shape_mismatch_is_processing_error() {
    let err = colorize(
        &ramp(5),
        2,
        2,
        finite,
        &Palette::new(PaletteId::Viridis),
        &ColorizeOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.category(), "ProcessingError");
}
