//! Single-band GeoTIFF codec.
//!
//! Reads band 1 of a (Geo)TIFF into a [`RasterBand`] and writes float32
//! rasters back out. Geospatial tags are treated as opaque: whatever the
//! source file carries is copied verbatim onto the outputs, so the
//! coordinate reference survives without this crate having to understand it.
//!
//! ```ignore
//! use geotiff_codec::{read_geotiff, write_geotiff, OutputRaster};
//!
//! let band = read_geotiff("slope.tif")?;
//! let out = OutputRaster::new(band.values(), band.width(), band.height(), band.meta(), -9999.0);
//! write_geotiff(&out, "slope_copy.tif")?;
//! ```
//!
//! [`RasterBand`]: raster_common::RasterBand

pub mod reader;
pub mod writer;

pub use reader::{read_geotiff, read_geotiff_from_buffer};
pub use writer::{write_geotiff, write_geotiff_to_buffer, OutputRaster};
