//! GeoTIFF decoding.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use raster_common::{GeoMetadata, RasterBand, ReclassError, ReclassResult};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// Read band 1 of a GeoTIFF file.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> ReclassResult<RasterBand> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ReclassError::codec(format!("Cannot open {}: {}", path.display(), e)))?;
    let band = decode_geotiff(BufReader::new(file))?;

    debug!(
        path = %path.display(),
        width = band.width(),
        height = band.height(),
        nodata = ?band.nodata(),
        "Decoded raster"
    );
    Ok(band)
}

/// Read band 1 of a GeoTIFF held in memory.
pub fn read_geotiff_from_buffer(data: &[u8]) -> ReclassResult<RasterBand> {
    decode_geotiff(Cursor::new(data))
}

fn decode_geotiff<R: Read + Seek>(reader: R) -> ReclassResult<RasterBand> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| ReclassError::codec(format!("TIFF decode error: {}", e)))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| ReclassError::codec(format!("Cannot read dimensions: {}", e)))?;
    let (width, height) = (width as usize, height as usize);

    let samples = decoder
        .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)
        .map_err(|e| ReclassError::codec(format!("Cannot read SamplesPerPixel: {}", e)))?
        .unwrap_or(1)
        .max(1) as usize;

    let meta = read_geo_metadata(&mut decoder);
    let nodata = read_nodata(&mut decoder);

    let result = decoder
        .read_image()
        .map_err(|e| ReclassError::codec(format!("Cannot read image data: {}", e)))?;

    let values = first_band(result, samples);
    if values.len() != width * height {
        return Err(ReclassError::InvalidDimensions {
            width,
            height,
            len: values.len(),
        });
    }

    Ok(RasterBand::new(values, width, height)?
        .with_nodata(nodata)
        .with_meta(meta))
}

/// Extract band 1 from a pixel-interleaved buffer as f64.
fn first_band(result: DecodingResult, samples: usize) -> Vec<f64> {
    macro_rules! band_one {
        ($buf:expr) => {
            $buf.iter().step_by(samples).map(|&v| v as f64).collect()
        };
    }

    match result {
        DecodingResult::U8(buf) => band_one!(buf),
        DecodingResult::U16(buf) => band_one!(buf),
        DecodingResult::U32(buf) => band_one!(buf),
        DecodingResult::U64(buf) => band_one!(buf),
        DecodingResult::I8(buf) => band_one!(buf),
        DecodingResult::I16(buf) => band_one!(buf),
        DecodingResult::I32(buf) => band_one!(buf),
        DecodingResult::I64(buf) => band_one!(buf),
        DecodingResult::F32(buf) => band_one!(buf),
        DecodingResult::F64(buf) => band_one!(buf),
    }
}

/// Collect every geospatial tag present in the first IFD.
///
/// Absent or unreadable tags are left as `None`; a plain TIFF decodes with
/// empty metadata.
fn read_geo_metadata<R: Read + Seek>(decoder: &mut Decoder<R>) -> GeoMetadata {
    GeoMetadata {
        pixel_scale: decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok(),
        tiepoint: decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok(),
        model_transformation: decoder.get_tag_f64_vec(Tag::ModelTransformationTag).ok(),
        geo_key_directory: decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).ok(),
        geo_double_params: decoder.get_tag_f64_vec(Tag::GeoDoubleParamsTag).ok(),
        geo_ascii_params: decoder.get_tag_ascii_string(Tag::GeoAsciiParamsTag).ok(),
    }
}

/// GDAL_NODATA is stored as ASCII text.
fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()?;
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .parse()
        .ok()
}
