//! GeoTIFF decoding.

use overlay_common::{OverlayError, OverlayResult};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

use crate::{GeoTransform, RasterDataset};

/// Upper bound for decoder buffers (1 GB).
const DECODE_LIMIT_BYTES: usize = 1024 * 1024 * 1024;

const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Read band 1 of a GeoTIFF file.
///
/// Missing files, files that are not TIFFs and TIFFs without georeferencing
/// tags are data source errors. A pixel buffer whose length disagrees with
/// the declared shape is a processing error.
pub fn read_geotiff(path: &Path) -> OverlayResult<RasterDataset> {
    let path_str = path.display().to_string();
    let source_err = |message: String| OverlayError::data_source(path_str.clone(), message);

    if !path.exists() {
        return Err(source_err("file does not exist".to_string()));
    }
    let file = File::open(path).map_err(|e| source_err(e.to_string()))?;

    let mut decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| source_err(format!("not a TIFF: {}", e)))?;

    let mut limits = Limits::default();
    limits.decoding_buffer_size = DECODE_LIMIT_BYTES;
    limits.intermediate_buffer_size = DECODE_LIMIT_BYTES;
    limits.ifd_value_size = DECODE_LIMIT_BYTES;
    decoder = decoder.with_limits(limits);

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| source_err(format!("cannot read dimensions: {}", e)))?;
    let (width, height) = (width as usize, height as usize);

    let transform = read_geotransform(&mut decoder)
        .ok_or_else(|| source_err("missing GeoTIFF georeferencing tags".to_string()))?;
    let nodata = read_nodata_value(&mut decoder);
    let samples_per_pixel = decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .map(|n| n.max(1) as usize)
        .unwrap_or(1);

    let samples = decode_samples(&mut decoder)
        .map_err(|e| source_err(format!("cannot decode pixel data: {}", e)))?;

    let expected = width * height * samples_per_pixel;
    if samples.len() != expected {
        return Err(OverlayError::processing(format!(
            "'{}' decoded {} samples, expected {} ({}x{}x{})",
            path_str,
            samples.len(),
            expected,
            width,
            height,
            samples_per_pixel
        )));
    }

    // Interleaved files contribute their first sample only
    let band = if samples_per_pixel == 1 {
        samples
    } else {
        samples.into_iter().step_by(samples_per_pixel).collect()
    };

    debug!(
        path = %path_str,
        width,
        height,
        samples_per_pixel,
        nodata = ?nodata,
        "Decoded GeoTIFF band"
    );

    RasterDataset::new(band, width, height, nodata, transform)
}

/// Read the affine transform from ModelTiepoint + ModelPixelScale, falling
/// back to ModelTransformation.
///
/// PixelIsPoint rasters tie pixel centers to model space; the returned
/// transform always addresses pixel corners.
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
    let pixel_scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);

    let transform = match (tiepoint, pixel_scale) {
        (Ok(tiepoint), Ok(scale)) => GeoTransform::from_tiepoint(&tiepoint, &scale),
        _ => None,
    }
    .or_else(|| {
        decoder
            .get_tag_f64_vec(Tag::ModelTransformationTag)
            .ok()
            .and_then(|matrix| GeoTransform::from_model_transformation(&matrix))
    })?;

    if read_raster_type(decoder) == Some(RASTER_PIXEL_IS_POINT) {
        debug!("Raster is PixelIsPoint, shifting origin to pixel corner");
        return Some(transform.pixel_center_to_corner());
    }
    Some(transform)
}

/// GTRasterTypeGeoKey from the GeoKeyDirectory, when stored inline.
fn read_raster_type<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<u16> {
    let directory = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).ok()?;
    find_geo_key(&directory, GT_RASTER_TYPE_GEO_KEY)
}

/// Look up a SHORT-valued key in a GeoKeyDirectory.
///
/// Layout: a 4-entry header `[version, revision, minor, key_count]` followed
/// by `key_count` entries of `[key_id, tag_location, count, value]`. Only
/// entries with `tag_location == 0` carry their value inline.
fn find_geo_key(directory: &[u16], key: u16) -> Option<u16> {
    let header = directory.get(..4)?;
    let key_count = header[3] as usize;
    directory[4..]
        .chunks_exact(4)
        .take(key_count)
        .find(|entry| entry[0] == key && entry[1] == 0)
        .map(|entry| entry[3])
}

/// No-data sentinel from the GDAL_NODATA ASCII tag, if present.
fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()
        .and_then(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok())
}

/// Decode the pixel buffer, widening every sample type to `f32`.
fn decode_samples<R: Read + Seek>(decoder: &mut Decoder<R>) -> tiff::TiffResult<Vec<f32>> {
    let result = decoder.read_image()?;

    Ok(match result {
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_geo_key_inline_value() {
        // Header, GTModelTypeGeoKey = 2, GTRasterTypeGeoKey = 2
        let directory = [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, 2];
        assert_eq!(find_geo_key(&directory, 1025), Some(2));
        assert_eq!(find_geo_key(&directory, 3072), None);
    }

    #[test]
    fn test_find_geo_key_ignores_out_of_line_values() {
        let directory = [1, 1, 0, 1, 1025, 34736, 1, 0];
        assert_eq!(find_geo_key(&directory, 1025), None);
    }

    #[test]
    fn test_find_geo_key_truncated_directory() {
        assert_eq!(find_geo_key(&[1, 1], 1025), None);
        assert_eq!(find_geo_key(&[1, 1, 0, 3, 1025, 0, 1], 1025), None);
    }
}
