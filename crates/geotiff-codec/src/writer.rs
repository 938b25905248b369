//! GeoTIFF encoding.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use raster_common::{GeoMetadata, ReclassError, ReclassResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind, TiffValue};
use tiff::tags::Tag;
use tracing::debug;

/// A raster ready to be written: values, shape, metadata and nodata sentinel.
#[derive(Debug, Clone, Copy)]
pub struct OutputRaster<'a> {
    /// Values in row-major order; written as float32.
    pub values: &'a [f64],
    pub width: usize,
    pub height: usize,
    /// Geospatial tags copied onto the output.
    pub meta: &'a GeoMetadata,
    /// Value recorded in the GDAL_NODATA tag.
    pub nodata: f64,
}

impl<'a> OutputRaster<'a> {
    pub fn new(
        values: &'a [f64],
        width: usize,
        height: usize,
        meta: &'a GeoMetadata,
        nodata: f64,
    ) -> Self {
        Self {
            values,
            width,
            height,
            meta,
            nodata,
        }
    }
}

/// Write a raster to a GeoTIFF file.
pub fn write_geotiff<P: AsRef<Path>>(raster: &OutputRaster<'_>, path: P) -> ReclassResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| ReclassError::codec(format!("Cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    encode_geotiff(raster, &mut writer)?;
    writer
        .flush()
        .map_err(|e| ReclassError::codec(format!("Cannot flush {}: {}", path.display(), e)))?;

    debug!(
        path = %path.display(),
        width = raster.width,
        height = raster.height,
        "Encoded raster"
    );
    Ok(())
}

/// Write a raster to an in-memory GeoTIFF buffer.
pub fn write_geotiff_to_buffer(raster: &OutputRaster<'_>) -> ReclassResult<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn encode_geotiff<W: Write + Seek>(raster: &OutputRaster<'_>, writer: W) -> ReclassResult<()> {
    if raster.values.len() != raster.width * raster.height {
        return Err(ReclassError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
            len: raster.values.len(),
        });
    }

    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| ReclassError::codec(format!("TIFF encoder error: {}", e)))?;

    let data: Vec<f32> = raster.values.iter().map(|&v| v as f32).collect();

    let mut image = encoder
        .new_image::<Gray32Float>(raster.width as u32, raster.height as u32)
        .map_err(|e| ReclassError::codec(format!("Cannot create TIFF image: {}", e)))?;

    let meta = raster.meta;
    let dir = image.encoder();
    if let Some(scale) = &meta.pixel_scale {
        write_tag(dir, Tag::ModelPixelScaleTag, scale.as_slice())?;
    }
    if let Some(tiepoint) = &meta.tiepoint {
        write_tag(dir, Tag::ModelTiepointTag, tiepoint.as_slice())?;
    }
    if let Some(matrix) = &meta.model_transformation {
        write_tag(dir, Tag::ModelTransformationTag, matrix.as_slice())?;
    }
    if let Some(keys) = &meta.geo_key_directory {
        write_tag(dir, Tag::GeoKeyDirectoryTag, keys.as_slice())?;
    }
    if let Some(params) = &meta.geo_double_params {
        write_tag(dir, Tag::GeoDoubleParamsTag, params.as_slice())?;
    }
    if let Some(params) = &meta.geo_ascii_params {
        write_tag(dir, Tag::GeoAsciiParamsTag, params.as_str())?;
    }
    write_tag(dir, Tag::GdalNodata, format_nodata(raster.nodata).as_str())?;

    image
        .write_data(&data)
        .map_err(|e| ReclassError::codec(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

fn write_tag<W, K, T>(dir: &mut DirectoryEncoder<'_, W, K>, tag: Tag, value: T) -> ReclassResult<()>
where
    W: Write + Seek,
    K: TiffKind,
    T: TiffValue,
{
    dir.write_tag(tag, value)
        .map_err(|e| ReclassError::codec(format!("Cannot write tag {:?}: {}", tag, e)))
}

/// GDAL writes integral sentinels without a fractional part ("-9999").
fn format_nodata(nodata: f64) -> String {
    if nodata.is_finite() && nodata.fract() == 0.0 {
        format!("{}", nodata as i64)
    } else {
        format!("{}", nodata)
    }
}
