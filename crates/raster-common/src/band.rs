//! In-memory raster band.

use crate::error::{ReclassError, ReclassResult};
use crate::geo::GeoMetadata;

/// Nodata sentinel written into every raster the engine produces.
///
/// Unrelated to the nodata value of any input band.
pub const OUTPUT_NODATA: f64 = -9999.0;

/// A single band of raster samples plus the metadata of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBand {
    /// Sample values (row-major order, top-to-bottom).
    values: Vec<f64>,
    /// Width in pixels.
    width: usize,
    /// Height in pixels.
    height: usize,
    /// Nodata sentinel of the input encoding, if the file declares one.
    nodata: Option<f64>,
    /// Geospatial descriptor, carried through unchanged.
    meta: GeoMetadata,
}

impl RasterBand {
    /// Create a band from row-major values.
    pub fn new(values: Vec<f64>, width: usize, height: usize) -> ReclassResult<Self> {
        if values.len() != width * height {
            return Err(ReclassError::InvalidDimensions {
                width,
                height,
                len: values.len(),
            });
        }

        Ok(Self {
            values,
            width,
            height,
            nodata: None,
            meta: GeoMetadata::default(),
        })
    }

    /// Attach the input nodata sentinel.
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Attach geospatial metadata.
    pub fn with_meta(mut self, meta: GeoMetadata) -> Self {
        self.meta = meta;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn meta(&self) -> &GeoMetadata {
        &self.meta
    }

    /// Get the value at a specific pixel.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
