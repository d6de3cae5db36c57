//! Minimal GeoTIFF writer for test datasets.
//!
//! Writes a north-up grid with ModelTiepoint/ModelPixelScale georeferencing,
//! a GeoKeyDirectory and an optional GDAL_NODATA tag, which is everything
//! the raster reader looks at.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use crate::fixtures::extent;

/// Description of a synthetic single-band GeoTIFF.
#[derive(Debug, Clone)]
pub struct GeoTiffSpec {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    /// `(south, west, north, east)`
    pub extent: (f64, f64, f64, f64),
    pub nodata: Option<f64>,
    /// Write the georeferencing tags (disable to produce a plain TIFF)
    pub georeferenced: bool,
    /// Tag pixel centers instead of corners (GTRasterTypeGeoKey = PixelIsPoint)
    pub pixel_is_point: bool,
}

impl GeoTiffSpec {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            data,
            extent: extent::BRAZIL_COAST,
            nodata: None,
            georeferenced: true,
            pixel_is_point: false,
        }
    }

    pub fn with_extent(mut self, extent: (f64, f64, f64, f64)) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn without_georeferencing(mut self) -> Self {
        self.georeferenced = false;
        self
    }

    /// Keep the same extent but tie the center of the first pixel.
    pub fn with_pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    fn pixel_scale(&self) -> [f64; 3] {
        let (south, west, north, east) = self.extent;
        [
            (east - west) / self.width as f64,
            (north - south) / self.height as f64,
            0.0,
        ]
    }

    fn tiepoint(&self) -> [f64; 6] {
        let (_, west, north, _) = self.extent;
        if self.pixel_is_point {
            let [scale_x, scale_y, _] = self.pixel_scale();
            [0.0, 0.0, 0.0, west + scale_x / 2.0, north - scale_y / 2.0, 0.0]
        } else {
            [0.0, 0.0, 0.0, west, north, 0.0]
        }
    }

    /// GeoKeyDirectory with GTModelTypeGeoKey = Geographic and the raster type.
    fn geo_keys(&self) -> [u16; 12] {
        let raster_type = if self.pixel_is_point { 2 } else { 1 };
        [1, 1, 0, 2, 1024, 0, 1, 2, 1025, 0, 1, raster_type]
    }

    /// Write as a 32-bit float GeoTIFF into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).expect("create GeoTIFF file");
        let mut encoder = TiffEncoder::new(BufWriter::new(file)).expect("create TIFF encoder");
        let mut image = encoder
            .new_image::<colortype::Gray32Float>(self.width as u32, self.height as u32)
            .expect("start TIFF image");

        if self.georeferenced {
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &self.pixel_scale()[..])
                .expect("write pixel scale");
            image
                .encoder()
                .write_tag(Tag::ModelTiepointTag, &self.tiepoint()[..])
                .expect("write tiepoint");
            image
                .encoder()
                .write_tag(Tag::GeoKeyDirectoryTag, &self.geo_keys()[..])
                .expect("write geokeys");
        }
        if let Some(nodata) = self.nodata {
            image
                .encoder()
                .write_tag(Tag::GdalNodata, nodata.to_string().as_str())
                .expect("write nodata");
        }

        image.write_data(&self.data).expect("write TIFF data");
        path
    }

    /// Write as a 16-bit unsigned GeoTIFF (values are truncated to `u16`).
    pub fn write_u16_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).expect("create GeoTIFF file");
        let mut encoder = TiffEncoder::new(BufWriter::new(file)).expect("create TIFF encoder");
        let mut image = encoder
            .new_image::<colortype::Gray16>(self.width as u32, self.height as u32)
            .expect("start TIFF image");

        if self.georeferenced {
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &self.pixel_scale()[..])
                .expect("write pixel scale");
            image
                .encoder()
                .write_tag(Tag::ModelTiepointTag, &self.tiepoint()[..])
                .expect("write tiepoint");
            image
                .encoder()
                .write_tag(Tag::GeoKeyDirectoryTag, &self.geo_keys()[..])
                .expect("write geokeys");
        }
        if let Some(nodata) = self.nodata {
            image
                .encoder()
                .write_tag(Tag::GdalNodata, nodata.to_string().as_str())
                .expect("write nodata");
        }

        let samples: Vec<u16> = self.data.iter().map(|&v| v as u16).collect();
        image.write_data(&samples).expect("write TIFF data");
        path
    }
}

/// Write a file that is not a TIFF at all.
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not a raster").expect("write garbage file");
    path
}
