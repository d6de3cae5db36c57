//! Raster processor: dataset in, georeferenced PNG artifact out.

use overlay_common::{BoundingBox, OverlayResult};
use raster_source::RasterDataset;
use renderer::colorize::{colorize, ColorizeOptions};
use renderer::palette::{resolve, Palette};
use renderer::stretch::{DEFAULT_HIGH_PERCENTILE, DEFAULT_LOW_PERCENTILE};
use renderer::{png, NormalizationRange, OutOfRange};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::artifact::{ArtifactPass, ImageArtifact};

/// Stretch settings shared by every layer of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorOptions {
    pub out_of_range: OutOfRange,
    pub low_percentile: f64,
    pub high_percentile: f64,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            out_of_range: OutOfRange::Clamp,
            low_percentile: DEFAULT_LOW_PERCENTILE,
            high_percentile: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

impl From<ProcessorOptions> for ColorizeOptions {
    fn from(opts: ProcessorOptions) -> Self {
        ColorizeOptions {
            out_of_range: opts.out_of_range,
            low_percentile: opts.low_percentile,
            high_percentile: opts.high_percentile,
        }
    }
}

/// Encoded image of one dataset, before it is written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRaster {
    pub png: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub bounds: BoundingBox,
    pub range: Option<NormalizationRange>,
    pub defined_cells: usize,
}

/// Result of processing one dataset within a pass.
#[derive(Debug)]
pub struct ProcessedRaster {
    pub image: ImageArtifact,
    pub bounds: BoundingBox,
    pub width: usize,
    pub height: usize,
    pub range: Option<NormalizationRange>,
    pub defined_cells: usize,
}

/// Turns one layer's source into an image artifact of the current pass.
pub trait LayerProcessor {
    fn process(
        &self,
        source: &Path,
        palette_id: &str,
        pass: &mut ArtifactPass,
    ) -> OverlayResult<ProcessedRaster>;
}

/// Turns raster datasets into overlay images.
#[derive(Debug, Clone, Default)]
pub struct RasterProcessor {
    options: ProcessorOptions,
}

impl RasterProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Process the dataset at `source` with the named palette and write the
    /// image into `pass`.
    ///
    /// Errors are returned to the caller unchanged; nothing is retried.
    pub fn process(
        &self,
        source: &Path,
        palette_id: &str,
        pass: &mut ArtifactPass,
    ) -> OverlayResult<ProcessedRaster> {
        let palette = resolve(palette_id)?;
        let dataset = RasterDataset::open(source)?;
        let encoded = self.render_dataset(&dataset, &palette)?;

        let label = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("raster");
        let image = pass.write_png(label, &encoded.png)?;

        info!(
            source = %source.display(),
            palette = %palette.id(),
            width = encoded.width,
            height = encoded.height,
            defined = encoded.defined_cells,
            artifact = %image.path().display(),
            "Processed raster"
        );

        Ok(ProcessedRaster {
            image,
            bounds: encoded.bounds,
            width: encoded.width,
            height: encoded.height,
            range: encoded.range,
            defined_cells: encoded.defined_cells,
        })
    }

    /// Mask, stretch, colorize and encode an in-memory dataset.
    ///
    /// Pure: the same dataset and palette always give byte-identical PNG data.
    pub fn render_dataset(
        &self,
        dataset: &RasterDataset,
        palette: &Palette,
    ) -> OverlayResult<EncodedRaster> {
        let options: ColorizeOptions = self.options.into();
        let image = colorize(
            dataset.data(),
            dataset.width(),
            dataset.height(),
            |v| dataset.is_defined(v),
            palette,
            &options,
        )?;

        if image.defined_cells == 0 {
            debug!("Dataset has no defined cells, overlay will be fully transparent");
        }

        let png = png::create_png_auto(&image.pixels, image.width, image.height)?;

        Ok(EncodedRaster {
            png,
            width: image.width,
            height: image.height,
            bounds: dataset.bounds(),
            range: image.range,
            defined_cells: image.defined_cells,
        })
    }
}

impl LayerProcessor for RasterProcessor {
    fn process(
        &self,
        source: &Path,
        palette_id: &str,
        pass: &mut ArtifactPass,
    ) -> OverlayResult<ProcessedRaster> {
        RasterProcessor::process(self, source, palette_id, pass)
    }
}
