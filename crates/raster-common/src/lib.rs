//! Common types and utilities shared across the raster scoring workspace.

pub mod band;
pub mod error;
pub mod geo;

pub use band::{RasterBand, OUTPUT_NODATA};
pub use error::{ReclassError, ReclassResult};
pub use geo::GeoMetadata;
