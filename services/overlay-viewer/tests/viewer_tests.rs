//! End-to-end tests: configuration through to the written map page.

use compositor::{ArtifactStore, LayerCompositor, LayerOutcome, MapView, RasterProcessor};
use overlay_common::{FeatureProperties, LocationPreset};
use overlay_viewer::{HtmlMapView, ViewerConfig};
use std::fs;
use std::path::Path;
use test_utils::{layers, ramp_grid, GeoTiffSpec};

fn shipped_config() -> ViewerConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/viewer.yaml");
    ViewerConfig::from_file(&path).expect("shipped config parses")
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = shipped_config();
    let defaults = ViewerConfig::default();

    assert_eq!(config.layers, defaults.layers);
    assert_eq!(config.zoom, 11);
    assert_eq!(config.effective_center(), LocationPreset::Brazil.center());
    assert_eq!(config.processing, defaults.processing);
}

#[test]
fn test_custom_center_wins_over_location() {
    let config = ViewerConfig::from_yaml_str(
        "location: tokyo\ncenter: { lat: 10.5, lon: -20.25 }\nzoom: 4\nlayers: []\n",
    )
    .unwrap();

    let view = config.map_view_config().unwrap();
    assert_eq!(view.center.lat, 10.5);
    assert_eq!(view.center.lon, -20.25);
    assert_eq!(view.zoom, 4);
}

#[test]
fn test_zoom_out_of_range_is_config_error() {
    let config = ViewerConfig::from_yaml_str("zoom: 19\n").unwrap();
    let err = config.map_view_config().unwrap_err();
    assert_eq!(err.category(), "ConfigError");
}

#[test]
fn test_relative_sources_resolve_against_data_dir() {
    let mut config = ViewerConfig::default();
    config.data_dir = "/srv/rasters".into();

    let resolved = config.resolved_layers();
    assert_eq!(
        resolved[0].source,
        Path::new("/srv/rasters/EMwmeanByROC_reclass.tif")
    );
}

#[test]
fn test_render_pass_writes_page_and_cleans_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    GeoTiffSpec::new(20, 10, ramp_grid(20, 10)).write_to(&data_dir, "EMwmeanByROC_reclass.tif");

    let mut config = ViewerConfig::default();
    config.data_dir = data_dir;
    config.set_layer_active(layers::ELEVATION, true).unwrap();
    config.layers.push(overlay_common::LayerConfig::new(
        "Missing",
        "does_not_exist.tif",
        "viridis",
        0.5,
        true,
    ));

    let artifacts = dir.path().join("artifacts");
    let output = dir.path().join("site");
    let compositor = LayerCompositor::new(
        RasterProcessor::new(config.processing),
        ArtifactStore::new(&artifacts),
    );
    let mut props = FeatureProperties::new();
    props.insert("class".to_string(), serde_json::json!(2));
    let mut view = HtmlMapView::new(config.map_view_config().unwrap(), &config.title, &output)
        .with_selected_feature(props);

    let outcomes = compositor.render(config.resolved_layers(), &mut view);

    let successes = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(successes, 2);
    assert!(matches!(outcomes[2], LayerOutcome::Failure(_)));

    let page = fs::read_to_string(view.index_path()).unwrap();
    assert!(page.contains(layers::SATELLITE));
    assert!(page.contains(layers::ELEVATION));
    assert!(page.contains("Selected Feature Properties"));
    assert!(output.join("overlay-0.png").exists());
    assert!(output.join("overlay-1.png").exists());
    assert!(!output.join("overlay-2.png").exists());

    let left = fs::read_dir(&artifacts).map(|d| d.count()).unwrap_or(0);
    assert_eq!(left, 0);
    assert!(view.last_selected_feature().is_some());
}
