//! Tests for the raster processor.

use approx::assert_relative_eq;
use compositor::{ArtifactStore, ProcessorOptions, RasterProcessor};
use overlay_common::OverlayError;
use raster_source::{GeoTransform, RasterDataset};
use renderer::palette::{Palette, PaletteId};
use renderer::OutOfRange;
use test_utils::{constant_grid, extent, nodata, palettes, ramp_grid, ramp_with_sentinel, GeoTiffSpec};

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).expect("valid PNG").to_rgba8()
}

#[test]
fn test_nodata_cells_are_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let (data, masked) = ramp_with_sentinel(10, 10, nodata::FLOAT_DEFAULT as f32, 7);
    let path = GeoTiffSpec::new(10, 10, data)
        .with_nodata(nodata::FLOAT_DEFAULT)
        .write_to(dir.path(), "masked.tif");

    let mut pass = ArtifactStore::new(dir.path().join("artifacts"))
        .begin_pass()
        .unwrap();
    let processed = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap();

    assert_eq!(processed.defined_cells, 100 - masked.len());
    let img = decode(&processed.image.read().unwrap());
    assert_eq!(img.dimensions(), (10, 10));
    for (i, px) in img.pixels().enumerate() {
        if masked.contains(&i) {
            assert_eq!(px.0, [0, 0, 0, 0], "cell {} should be masked", i);
        } else {
            assert_eq!(px.0[3], 255, "cell {} should be opaque", i);
        }
    }
}

#[test]
fn test_nodata_excluded_from_percentiles() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = ramp_grid(10, 10);
    data[50] = nodata::FLOAT_DEFAULT as f32;
    let path = GeoTiffSpec::new(10, 10, data)
        .with_nodata(nodata::FLOAT_DEFAULT)
        .write_to(dir.path(), "one_hole.tif");

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let range = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap()
        .range
        .unwrap();

    // -9999 would drag the low percentile far below zero
    assert!(range.low > 0.0);
}

#[test]
fn test_ramp_stretch_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(10, 10, ramp_grid(10, 10)).write_to(dir.path(), "ramp.tif");

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let range = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap()
        .range
        .unwrap();

    assert_relative_eq!(range.low, 2.0, epsilon = 0.05);
    assert_relative_eq!(range.high, 97.0, epsilon = 0.05);
    assert_eq!(range.normalize(range.low), 0.0);
    assert_eq!(range.normalize(range.high), 1.0);
}

#[test]
fn test_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(16, 12, ramp_grid(16, 12)).write_to(dir.path(), "ramp.tif");
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    let processor = RasterProcessor::default();

    let mut first = store.begin_pass().unwrap();
    let mut second = store.begin_pass().unwrap();
    let a = processor.process(&path, palettes::TERRAIN, &mut first).unwrap();
    let b = processor.process(&path, palettes::TERRAIN, &mut second).unwrap();

    assert_ne!(a.image.path(), b.image.path());
    assert_eq!(a.image.read().unwrap(), b.image.read().unwrap());
}

#[test]
fn test_render_dataset_is_pure() {
    let dataset = RasterDataset::new(
        ramp_grid(8, 8),
        8,
        8,
        None,
        GeoTransform::north_up(-17.0, -38.0, 0.25, 0.25),
    )
    .unwrap();
    let palette = Palette::new(PaletteId::Magma);
    let processor = RasterProcessor::default();

    let a = processor.render_dataset(&dataset, &palette).unwrap();
    let b = processor.render_dataset(&dataset, &palette).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_constant_raster_renders_single_color() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(5, 5, constant_grid(5, 5, 12.5)).write_to(dir.path(), "flat.tif");

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let processed = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap();

    assert!(processed.range.unwrap().is_degenerate());
    let expected = Palette::new(PaletteId::Viridis).sample(0.5).to_rgba();
    let img = decode(&processed.image.read().unwrap());
    assert!(img.pixels().all(|px| px.0 == expected));
}

#[test]
fn test_all_nodata_raster_is_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(4, 4, constant_grid(4, 4, -9999.0))
        .with_nodata(nodata::FLOAT_DEFAULT)
        .write_to(dir.path(), "empty.tif");

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let processed = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap();

    assert_eq!(processed.range, None);
    let img = decode(&processed.image.read().unwrap());
    assert!(img.pixels().all(|px| px.0[3] == 0));
}

#[test]
fn test_transparent_out_of_range_option() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(10, 10, ramp_grid(10, 10)).write_to(dir.path(), "ramp.tif");
    let processor = RasterProcessor::new(ProcessorOptions {
        out_of_range: OutOfRange::Transparent,
        ..ProcessorOptions::default()
    });

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let processed = processor.process(&path, palettes::VIRIDIS, &mut pass).unwrap();
    let img = decode(&processed.image.read().unwrap());

    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(5, 5).0[3], 255);
    assert_eq!(img.get_pixel(9, 9).0[3], 0);
}

#[test]
fn test_bounds_follow_dataset_extent() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(30, 20, ramp_grid(30, 20))
        .with_extent(extent::LONDON)
        .write_to(dir.path(), "london.tif");

    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();
    let bounds = RasterProcessor::default()
        .process(&path, palettes::VIRIDIS, &mut pass)
        .unwrap()
        .bounds;

    let (south, west, north, east) = extent::LONDON;
    assert_relative_eq!(bounds.south, south, epsilon = 1e-9);
    assert_relative_eq!(bounds.west, west, epsilon = 1e-9);
    assert_relative_eq!(bounds.north, north, epsilon = 1e-9);
    assert_relative_eq!(bounds.east, east, epsilon = 1e-9);
}

#[test]
fn test_missing_source_is_data_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();

    let err = RasterProcessor::default()
        .process(&dir.path().join("nope.tif"), palettes::VIRIDIS, &mut pass)
        .unwrap_err();
    assert!(matches!(err, OverlayError::DataSource { .. }));
    assert_eq!(pass.written(), 0);
}

#[test]
fn test_unknown_palette_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = GeoTiffSpec::new(4, 4, ramp_grid(4, 4)).write_to(dir.path(), "ramp.tif");
    let mut pass = ArtifactStore::new(dir.path()).begin_pass().unwrap();

    let err = RasterProcessor::default()
        .process(&path, "jet", &mut pass)
        .unwrap_err();
    assert_eq!(err.category(), "ConfigError");
}
