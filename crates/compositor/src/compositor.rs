//! Layer compositor.
//!
//! Runs one render pass: processes every active layer in configured order,
//! hands the successful overlays to the map view, then releases every
//! artifact the pass created. A failing layer never aborts the pass; it is
//! recorded as a [`LayerOutcome::Failure`] and the next layer is processed.

use overlay_common::{BoundingBox, LayerConfig, OverlayError, OverlayResult};
use renderer::NormalizationRange;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{info, info_span, warn};

use crate::artifact::{ArtifactPass, ArtifactStore, ImageArtifact};
use crate::map_view::MapView;
use crate::processor::{LayerProcessor, RasterProcessor};

/// A rendered layer ready to be attached to the map view.
#[derive(Debug)]
pub struct ProcessedOverlay {
    pub name: String,
    pub image: ImageArtifact,
    pub bounds: BoundingBox,
    pub opacity: f32,
    pub width: usize,
    pub height: usize,
    pub range: Option<NormalizationRange>,
}

/// What the caller learns about a layer that made it onto the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    pub name: String,
    pub source: PathBuf,
    pub bounds: BoundingBox,
    pub opacity: f32,
    pub width: usize,
    pub height: usize,
    pub range: Option<NormalizationRange>,
}

/// A layer that did not make it onto the map.
#[derive(Debug)]
pub struct LayerFailure {
    pub name: String,
    pub source: PathBuf,
    pub error: OverlayError,
}

/// Result of one active layer within a pass.
#[derive(Debug)]
pub enum LayerOutcome {
    Success(RenderedLayer),
    Failure(LayerFailure),
}

impl LayerOutcome {
    pub fn name(&self) -> &str {
        match self {
            LayerOutcome::Success(layer) => &layer.name,
            LayerOutcome::Failure(failure) => &failure.name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LayerOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&OverlayError> {
        match self {
            LayerOutcome::Success(_) => None,
            LayerOutcome::Failure(failure) => Some(&failure.error),
        }
    }
}

/// Composes raster layers onto a map view.
#[derive(Debug, Clone)]
pub struct LayerCompositor<P = RasterProcessor> {
    processor: P,
    store: ArtifactStore,
}

impl<P: LayerProcessor> LayerCompositor<P> {
    pub fn new(processor: P, store: ArtifactStore) -> Self {
        Self { processor, store }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run one render pass.
    ///
    /// Returns one outcome per active layer, in configured order. Inactive
    /// layers produce nothing. Once this returns, no artifact of the pass is
    /// left on disk.
    pub fn render(&self, layers: Vec<LayerConfig>, view: &mut dyn MapView) -> Vec<LayerOutcome> {
        let active: Vec<LayerConfig> = layers.into_iter().filter(|l| l.active).collect();
        view.reset();

        let mut pass = match self.store.begin_pass() {
            Ok(pass) => pass,
            Err(e) => {
                warn!(error = %e, "Cannot start render pass");
                let outcomes = active
                    .into_iter()
                    .map(|layer| {
                        let error = layer
                            .validate()
                            .err()
                            .unwrap_or_else(|| OverlayError::processing(e.to_string()));
                        LayerOutcome::Failure(LayerFailure {
                            error,
                            name: layer.name,
                            source: layer.source,
                        })
                    })
                    .collect();
                if let Err(e) = view.add_layer_control(&[]).and_then(|_| view.finish()) {
                    warn!(error = %e, "Map view failed without overlays");
                }
                return outcomes;
            }
        };

        let span = info_span!("render_pass", pass_id = %pass.id(), layers = active.len());
        let _guard = span.enter();

        let mut outcomes = Vec::with_capacity(active.len());
        let mut artifacts = Vec::new();
        let mut registered = Vec::new();

        for layer in active {
            match self.render_layer(&layer, &mut pass, view) {
                Ok((rendered, artifact)) => {
                    info!(layer = %rendered.name, "Layer added to map");
                    registered.push(rendered.name.clone());
                    artifacts.push(artifact);
                    outcomes.push(LayerOutcome::Success(rendered));
                }
                Err(error) => {
                    warn!(
                        layer = %layer.name,
                        source = %layer.source_display(),
                        category = error.category(),
                        error = %error,
                        "Layer failed"
                    );
                    outcomes.push(LayerOutcome::Failure(LayerFailure {
                        name: layer.name,
                        source: layer.source,
                        error,
                    }));
                }
            }
        }

        if let Err(e) = view
            .add_layer_control(&registered)
            .and_then(|_| view.finish())
        {
            warn!(error = %e, "Map view did not consume overlays");
            outcomes = outcomes
                .into_iter()
                .map(|outcome| demote_success(outcome, &e))
                .collect();
        }

        release_all(artifacts);

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            succeeded = outcomes.len() - failed,
            failed,
            artifacts = pass.written(),
            "Render pass complete"
        );
        outcomes
    }

    fn render_layer(
        &self,
        layer: &LayerConfig,
        pass: &mut ArtifactPass,
        view: &mut dyn MapView,
    ) -> OverlayResult<(RenderedLayer, ImageArtifact)> {
        layer.validate()?;

        let processed = panic::catch_unwind(AssertUnwindSafe(|| {
            self.processor.process(&layer.source, &layer.palette, pass)
        }))
        .map_err(|payload| {
            OverlayError::processing(format!(
                "processing panicked: {}",
                panic_message(payload.as_ref())
            ))
        })??;

        let overlay = ProcessedOverlay {
            name: layer.name.clone(),
            image: processed.image,
            bounds: processed.bounds,
            opacity: layer.opacity,
            width: processed.width,
            height: processed.height,
            range: processed.range,
        };

        // On error the overlay drops here and its artifact is removed.
        view.add_overlay(&overlay)?;

        let rendered = RenderedLayer {
            name: overlay.name,
            source: layer.source.clone(),
            bounds: overlay.bounds,
            opacity: overlay.opacity,
            width: overlay.width,
            height: overlay.height,
            range: overlay.range,
        };
        Ok((rendered, overlay.image))
    }
}

fn demote_success(outcome: LayerOutcome, cause: &OverlayError) -> LayerOutcome {
    match outcome {
        LayerOutcome::Success(layer) => LayerOutcome::Failure(LayerFailure {
            name: layer.name,
            source: layer.source,
            error: OverlayError::render(cause.to_string()),
        }),
        failure => failure,
    }
}

fn release_all(artifacts: Vec<ImageArtifact>) {
    for artifact in artifacts {
        let path = artifact.path().display().to_string();
        if let Err(e) = artifact.release() {
            warn!(path = %path, error = %e, "Artifact cleanup failed");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One user-facing line per failed layer, naming the layer and the path
/// that was attempted.
pub fn summarize_outcomes(outcomes: &[LayerOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            LayerOutcome::Success(_) => None,
            LayerOutcome::Failure(f) => Some(format!(
                "Layer '{}' ({}) failed with {}: {}",
                f.name,
                f.source.display(),
                f.error.category(),
                f.error
            )),
        })
        .collect()
}
