//! Static Leaflet page as a map view.
//!
//! Overlay images are copied next to `index.html`, so the page keeps working
//! after the render pass deleted its artifacts.

use compositor::{MapView, ProcessedOverlay};
use overlay_common::{FeatureProperties, MapViewConfig, OverlayError, OverlayResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Debug, Clone, Serialize)]
struct PageOverlay {
    name: String,
    file: String,
    bounds: [[f64; 2]; 2],
    opacity: f32,
}

/// Map view that writes `index.html` plus one PNG per overlay.
#[derive(Debug)]
pub struct HtmlMapView {
    config: MapViewConfig,
    title: String,
    output_dir: PathBuf,
    overlays: Vec<PageOverlay>,
    control: Vec<String>,
    selected: Option<FeatureProperties>,
}

impl HtmlMapView {
    pub fn new(config: MapViewConfig, title: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            title: title.into(),
            output_dir: output_dir.into(),
            overlays: Vec::new(),
            control: Vec::new(),
            selected: None,
        }
    }

    /// Show these properties as the selected feature.
    pub fn with_selected_feature(mut self, properties: FeatureProperties) -> Self {
        self.selected = Some(properties);
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Page source for the current state.
    pub fn render_page(&self) -> OverlayResult<String> {
        let overlays = script_json(&self.overlays)?;
        let control = script_json(&self.control)?;
        let base = script_json(&self.config.base_layer.name)?;
        let tiles = script_json(&self.config.base_layer.url_template)?;
        let attribution = script_json(&self.config.base_layer.attribution)?;
        let selected = match &self.selected {
            Some(props) => format!(
                "<h2>Selected Feature Properties</h2>\n<pre>{}</pre>",
                escape_html(&serde_json::to_string_pretty(props)?)
            ),
            None => String::new(),
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<style>#map {{ width: 1200px; height: 700px; }}</style>
</head>
<body>
<h1>{title}</h1>
<div id="map"></div>
{selected}
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
var base = L.tileLayer({tiles}, {{ attribution: {attribution} }}).addTo(map);
var overlays = {overlays};
var shown = {control};
var controlLayers = {{}};
overlays.forEach(function (o) {{
  var layer = L.imageOverlay(o.file, o.bounds, {{ opacity: o.opacity, interactive: true }}).addTo(map);
  if (shown.indexOf(o.name) >= 0) {{ controlLayers[o.name] = layer; }}
}});
var baseLayers = {{}};
baseLayers[{base}] = base;
L.control.layers(baseLayers, controlLayers).addTo(map);
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            leaflet = LEAFLET_VERSION,
            selected = selected,
            lat = self.config.center.lat,
            lon = self.config.center.lon,
            zoom = self.config.zoom,
            tiles = tiles,
            attribution = attribution,
            overlays = overlays,
            control = control,
            base = base,
        ))
    }
}

impl MapView for HtmlMapView {
    fn config(&self) -> &MapViewConfig {
        &self.config
    }

    fn reset(&mut self) {
        self.overlays.clear();
        self.control.clear();
    }

    fn add_overlay(&mut self, overlay: &ProcessedOverlay) -> OverlayResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            OverlayError::render(format!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let file = format!("overlay-{}.png", self.overlays.len());
        let target = self.output_dir.join(&file);
        fs::copy(overlay.image.path(), &target).map_err(|e| {
            OverlayError::render(format!("cannot copy image for '{}': {}", overlay.name, e))
        })?;
        debug!(layer = %overlay.name, file = %target.display(), "Copied overlay image");

        self.overlays.push(PageOverlay {
            name: overlay.name.clone(),
            file,
            bounds: overlay.bounds.to_leaflet_bounds(),
            opacity: overlay.opacity,
        });
        Ok(())
    }

    fn add_layer_control(&mut self, names: &[String]) -> OverlayResult<()> {
        self.control = names.to_vec();
        Ok(())
    }

    fn finish(&mut self) -> OverlayResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            OverlayError::render(format!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;
        let page = self.render_page()?;
        let index = self.index_path();
        fs::write(&index, page)
            .map_err(|e| OverlayError::render(format!("cannot write {}: {}", index.display(), e)))?;
        info!(path = %index.display(), overlays = self.overlays.len(), "Wrote map page");
        Ok(())
    }

    fn last_selected_feature(&self) -> Option<&FeatureProperties> {
        self.selected.as_ref()
    }
}

/// JSON literal that cannot close the surrounding `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> OverlayResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
