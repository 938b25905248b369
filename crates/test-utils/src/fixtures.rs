//! Common test fixtures for raster scoring tests.

use raster_common::{GeoMetadata, RasterBand};
use tempfile::TempDir;

use crate::generators::band_from_rows;

/// Metadata of a 10 m UTM zone 32N raster (EPSG:32632).
pub fn utm_metadata() -> GeoMetadata {
    GeoMetadata {
        pixel_scale: Some(vec![10.0, 10.0, 0.0]),
        tiepoint: Some(vec![0.0, 0.0, 0.0, 500000.0, 4650000.0, 0.0]),
        model_transformation: None,
        geo_key_directory: Some(vec![
            1, 1, 0, 3, // version 1.1.0, 3 keys
            1024, 0, 1, 1, // GTModelTypeGeoKey = Projected
            1025, 0, 1, 1, // GTRasterTypeGeoKey = PixelIsArea
            3072, 0, 1, 32632, // ProjectedCSTypeGeoKey = EPSG:32632
        ]),
        geo_double_params: None,
        geo_ascii_params: Some("WGS 84 / UTM zone 32N|".to_string()),
    }
}

/// The 2x2 band `[[1, 5], [10, -1]]`.
pub fn example_band() -> RasterBand {
    band_from_rows(&[&[1.0, 5.0], &[10.0, -1.0]])
}

/// Criteria `(val_min, val_max, new_val)` used with [`example_band`].
///
/// Pixel 1 matches only the first rule, pixel 5 matches both, 10 and -1
/// match neither.
pub const EXAMPLE_CRITERIA: [(f64, f64, f64); 2] = [(0.0, 5.0, 10.0), (5.0, 5.0, 1.0)];

/// Criteria CSV in the desktop tool layout.
pub const CRITERIA_CSV: &str = "\
filename,val_min,val_max,new_val,note
slope.tif,0,15,3,gentle
slope.tif,15,30,1,moderate
dem.tif,0,500,2,lowland
";

/// Creates a scratch directory removed when dropped.
pub fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("raster-scoring-test")
        .tempdir()
        .expect("Failed to create scratch directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_metadata_is_projected() {
        let meta = utm_metadata();
        assert!(!meta.is_empty());
        assert_eq!(meta.geo_key_directory.unwrap()[15], 32632);
    }

    #[test]
    fn test_example_band_shape() {
        let band = example_band();
        assert_eq!(band.shape(), (2, 2));
        assert_eq!(band.values(), &[1.0, 5.0, 10.0, -1.0]);
    }

    #[test]
    fn test_scratch_dir_exists() {
        let dir = scratch_dir();
        assert!(dir.path().is_dir());
    }
}
