//! The map view the compositor draws into.

use overlay_common::{FeatureProperties, MapViewConfig, OverlayError, OverlayResult};
use std::collections::HashSet;

use crate::compositor::ProcessedOverlay;

/// A map surface that shows a base layer plus image overlays.
///
/// The compositor calls, per pass: [`reset`](MapView::reset), then
/// [`add_overlay`](MapView::add_overlay) once per rendered layer in order,
/// then [`add_layer_control`](MapView::add_layer_control) once, then
/// [`finish`](MapView::finish). Artifact files are deleted right after
/// `finish` returns, so an implementation must have copied or embedded every
/// image by then.
pub trait MapView {
    /// Initial view settings.
    fn config(&self) -> &MapViewConfig;

    /// Drop overlays and controls left over from the previous pass.
    fn reset(&mut self);

    /// Attach one overlay above those already added.
    fn add_overlay(&mut self, overlay: &ProcessedOverlay) -> OverlayResult<()>;

    /// Show a visibility toggle for the named overlays.
    fn add_layer_control(&mut self, names: &[String]) -> OverlayResult<()>;

    /// Confirm that every overlay of the pass has been consumed.
    fn finish(&mut self) -> OverlayResult<()>;

    /// Properties of the feature the user last selected, if any.
    fn last_selected_feature(&self) -> Option<&FeatureProperties>;
}

/// An overlay as held by [`InMemoryMapView`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedOverlay {
    pub name: String,
    pub bounds: overlay_common::BoundingBox,
    pub opacity: f32,
    pub width: usize,
    pub height: usize,
    /// Encoded PNG, copied out of the artifact
    pub png: Vec<u8>,
}

/// Headless map view that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryMapView {
    config: MapViewConfig,
    overlays: Vec<DisplayedOverlay>,
    layer_control: Option<Vec<String>>,
    finished: bool,
    selected: Option<FeatureProperties>,
    rejected: HashSet<String>,
    fail_finish: bool,
}

impl InMemoryMapView {
    pub fn new(config: MapViewConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Refuse overlays with this name, as a broken view would.
    pub fn rejecting(mut self, name: impl Into<String>) -> Self {
        self.rejected.insert(name.into());
        self
    }

    /// Make [`MapView::finish`] fail.
    pub fn failing_finish(mut self) -> Self {
        self.fail_finish = true;
        self
    }

    /// Simulate the user clicking a feature.
    pub fn select_feature(&mut self, properties: FeatureProperties) {
        self.selected = Some(properties);
    }

    pub fn overlays(&self) -> &[DisplayedOverlay] {
        &self.overlays
    }

    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn layer_control(&self) -> Option<&[String]> {
        self.layer_control.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl MapView for InMemoryMapView {
    fn config(&self) -> &MapViewConfig {
        &self.config
    }

    fn reset(&mut self) {
        self.overlays.clear();
        self.layer_control = None;
        self.finished = false;
    }

    fn add_overlay(&mut self, overlay: &ProcessedOverlay) -> OverlayResult<()> {
        if self.rejected.contains(&overlay.name) {
            return Err(OverlayError::render(format!(
                "map view rejected overlay '{}'",
                overlay.name
            )));
        }

        let png = overlay.image.read().map_err(|e| {
            OverlayError::render(format!("cannot read image for '{}': {}", overlay.name, e))
        })?;

        self.overlays.push(DisplayedOverlay {
            name: overlay.name.clone(),
            bounds: overlay.bounds,
            opacity: overlay.opacity,
            width: overlay.width,
            height: overlay.height,
            png,
        });
        Ok(())
    }

    fn add_layer_control(&mut self, names: &[String]) -> OverlayResult<()> {
        self.layer_control = Some(names.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> OverlayResult<()> {
        if self.fail_finish {
            return Err(OverlayError::render("map view could not be rendered"));
        }
        self.finished = true;
        Ok(())
    }

    fn last_selected_feature(&self) -> Option<&FeatureProperties> {
        self.selected.as_ref()
    }
}
