//! Raster overlay viewer.
//!
//! Renders the configured GeoTIFF layers onto a Leaflet map page, reporting
//! each layer that could not be drawn without giving up on the others.

use anyhow::{Context, Result};
use clap::Parser;
use compositor::{
    summarize_outcomes, ArtifactStore, LayerCompositor, LayerOutcome, MapView, RasterProcessor,
};
use overlay_common::{FeatureProperties, LatLon, LocationPreset};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use overlay_viewer::{DataDirReport, HtmlMapView, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "overlay-viewer")]
#[command(about = "Render GeoTIFF layers as overlays on an interactive map")]
struct Args {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config/viewer.yaml", env = "OVERLAY_VIEWER_CONFIG")]
    config: PathBuf,

    /// Output directory for index.html and overlay images
    #[arg(short, long, default_value = "map-output")]
    output: PathBuf,

    /// Start location preset (brazil, london, tokyo)
    #[arg(long)]
    location: Option<String>,

    /// Custom center latitude (requires --lon)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Custom center longitude (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Zoom level (1-18)
    #[arg(short, long)]
    zoom: Option<u8>,

    /// Turn a configured layer on (repeatable)
    #[arg(long = "enable", value_name = "LAYER")]
    enable: Vec<String>,

    /// Turn a configured layer off (repeatable)
    #[arg(long = "disable", value_name = "LAYER")]
    disable: Vec<String>,

    /// JSON file with properties of a selected feature to show on the page
    #[arg(long)]
    feature: Option<PathBuf>,

    /// Print working directory and data directory contents
    #[arg(long)]
    debug: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args)?;

    let config = load_config(&args)?;
    let view_config = config.map_view_config()?;
    info!(
        center = %view_config.center,
        zoom = view_config.zoom,
        data_dir = %config.data_dir.display(),
        "Loaded configuration"
    );

    let report = DataDirReport::inspect(&config.data_dir);
    if !report.exists {
        warn!(data_dir = %config.data_dir.display(), "Data directory does not exist");
    }

    let mut view = HtmlMapView::new(view_config, config.title.clone(), &args.output);
    if let Some(path) = &args.feature {
        view = view.with_selected_feature(read_feature(path)?);
    }

    let store = config
        .artifact_dir
        .clone()
        .map(ArtifactStore::new)
        .unwrap_or_else(ArtifactStore::in_temp_dir);
    let compositor = LayerCompositor::new(RasterProcessor::new(config.processing), store);

    let outcomes = compositor.render(config.resolved_layers(), &mut view);

    for outcome in &outcomes {
        if let LayerOutcome::Success(layer) = outcome {
            println!(
                "Added '{}' ({}x{}, opacity {:.2})",
                layer.name, layer.width, layer.height, layer.opacity
            );
        }
    }
    for line in summarize_outcomes(&outcomes) {
        eprintln!("{}", line);
    }
    println!("Map written to {}", view.index_path().display());

    if let Some(props) = view.last_selected_feature() {
        println!("Selected Feature Properties:");
        println!("{}", serde_json::to_string_pretty(props)?);
    }

    if args.debug {
        println!("{}", report);
    }

    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// File, then environment, then flags.
fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = if args.config.exists() {
        ViewerConfig::from_file(&args.config)?
    } else {
        info!(path = %args.config.display(), "Config file not found, using defaults");
        ViewerConfig::default()
    };
    config.apply_env();

    if let Some(name) = &args.location {
        let preset = LocationPreset::from_name(name)
            .with_context(|| format!("unknown location '{}'", name))?;
        config.location = Some(preset);
        config.center = None;
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        config.center = Some(LatLon::new(lat, lon));
    }
    if let Some(zoom) = args.zoom {
        config.zoom = zoom;
    }
    for name in &args.enable {
        config.set_layer_active(name, true)?;
    }
    for name in &args.disable {
        config.set_layer_active(name, false)?;
    }

    Ok(config)
}

fn read_feature(path: &Path) -> Result<FeatureProperties> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read feature file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("feature file {} is not a JSON object", path.display()))
}
