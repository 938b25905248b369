//! Geospatial metadata carried alongside raster values.
//!
//! The engine never interprets these values. They are read from the source
//! file, held unchanged while the band is processed, and written back onto
//! every output derived from that band.

use serde::{Deserialize, Serialize};

/// Opaque geospatial descriptor of a raster file.
///
/// Each field holds the raw contents of the corresponding GeoTIFF tag, so a
/// decode/encode cycle reproduces the coordinate reference exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoMetadata {
    /// ModelPixelScaleTag (33550)
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepointTag (33922)
    pub tiepoint: Option<Vec<f64>>,
    /// ModelTransformationTag (34264)
    pub model_transformation: Option<Vec<f64>>,
    /// GeoKeyDirectoryTag (34735)
    pub geo_key_directory: Option<Vec<u16>>,
    /// GeoDoubleParamsTag (34736)
    pub geo_double_params: Option<Vec<f64>>,
    /// GeoAsciiParamsTag (34737)
    pub geo_ascii_params: Option<String>,
}

impl GeoMetadata {
    /// True if no geospatial tag is present (a plain TIFF).
    pub fn is_empty(&self) -> bool {
        self.pixel_scale.is_none()
            && self.tiepoint.is_none()
            && self.model_transformation.is_none()
            && self.geo_key_directory.is_none()
            && self.geo_double_params.is_none()
            && self.geo_ascii_params.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata() {
        let meta = GeoMetadata::default();
        assert!(meta.is_empty());
    }
}
