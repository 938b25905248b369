//! Synthetic raster band generators.
//!
//! These generators create predictable, verifiable bands so tests can state
//! exactly which pixels a criterion should match.

use raster_common::RasterBand;

/// Creates a band whose value is the pixel's row-major index.
///
/// Each cell value is calculated as: `row * width + col`
///
/// # Example
///
/// ```
/// use test_utils::ramp_band;
///
/// let band = ramp_band(4, 3);
/// assert_eq!(band.len(), 12);
/// assert_eq!(band.get(0, 0), Some(0.0));
/// assert_eq!(band.get(3, 0), Some(3.0));
/// assert_eq!(band.get(0, 1), Some(4.0));
/// ```
pub fn ramp_band(width: usize, height: usize) -> RasterBand {
    let values = (0..width * height).map(|i| i as f64).collect();
    RasterBand::new(values, width, height).expect("ramp dimensions are consistent")
}

/// Creates a band from explicit rows (top-to-bottom).
///
/// # Panics
///
/// Panics if the rows have different lengths.
///
/// ```
/// use test_utils::band_from_rows;
///
/// let band = band_from_rows(&[&[1.0, 5.0], &[10.0, -1.0]]);
/// assert_eq!(band.shape(), (2, 2));
/// assert_eq!(band.get(1, 1), Some(-1.0));
/// ```
pub fn band_from_rows(rows: &[&[f64]]) -> RasterBand {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    assert!(
        rows.iter().all(|r| r.len() == width),
        "all rows must have the same length"
    );

    let values = rows.iter().flat_map(|r| r.iter().copied()).collect();
    RasterBand::new(values, width, height).expect("row dimensions are consistent")
}

/// Creates a slope-like band in degrees (0 to ~45) with a declared input
/// nodata value in the bottom-right corner.
pub fn slope_band(width: usize, height: usize, nodata: f64) -> RasterBand {
    let mut values = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f64 / width.max(1) as f64;
            let y_factor = row as f64 / height.max(1) as f64;
            values.push((x_factor + y_factor) * 22.5);
        }
    }
    if let Some(last) = values.last_mut() {
        *last = nodata;
    }

    RasterBand::new(values, width, height)
        .expect("slope dimensions are consistent")
        .with_nodata(Some(nodata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_band() {
        let band = ramp_band(3, 2);
        assert_eq!(band.values(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_band_from_ragged_rows() {
        band_from_rows(&[&[1.0, 2.0], &[3.0]]);
    }

    #[test]
    fn test_slope_band_nodata_corner() {
        let band = slope_band(4, 4, -32768.0);
        assert_eq!(band.nodata(), Some(-32768.0));
        assert_eq!(band.get(3, 3), Some(-32768.0));
        assert!(band.values()[..15].iter().all(|&v| (0.0..=45.0).contains(&v)));
    }
}
