//! Threshold reclassification of a single band.

use raster_common::{RasterBand, OUTPUT_NODATA};

use crate::criteria::CriteriaSet;

/// Result of applying a [`CriteriaSet`] to one band.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRaster {
    /// Summed `new_val` of all matching rules, or [`OUTPUT_NODATA`].
    output: Vec<f64>,
    /// True where at least one rule matched.
    coverage: Vec<bool>,
    width: usize,
    height: usize,
}

impl ClassifiedRaster {
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn coverage_mask(&self) -> &[bool] {
        &self.coverage
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

    /// Number of pixels matched by at least one rule.
    pub fn covered_pixels(&self) -> usize {
        self.coverage.iter().filter(|&&c| c).count()
    }

    /// Percentage of covered pixels, rounded to two decimals with ties to
    /// even (`0.125` becomes `0.12`).
    ///
    /// A band with no pixels has 0% coverage.
    pub fn coverage_pct(&self) -> f64 {
        if self.coverage.is_empty() {
            return 0.0;
        }
        let pct = self.covered_pixels() as f64 / self.coverage.len() as f64 * 100.0;
        (pct * 100.0).round_ties_even() / 100.0
    }
}

/// Apply every rule to every pixel of `band`.
///
/// Matching rules add up, so a pixel inside two overlapping intervals gets the
/// sum of both `new_val`s. Pixels no rule matches become [`OUTPUT_NODATA`].
/// The band's own nodata value gets no special treatment.
pub fn classify(band: &RasterBand, criteria: &CriteriaSet) -> ClassifiedRaster {
    let values = band.values();
    let mut output = vec![0.0; values.len()];
    let mut coverage = vec![false; values.len()];

    for criterion in criteria {
        for ((&value, out), covered) in values
            .iter()
            .zip(output.iter_mut())
            .zip(coverage.iter_mut())
        {
            if criterion.matches(value) {
                *out += criterion.new_val;
                *covered = true;
            }
        }
    }

    for (out, &covered) in output.iter_mut().zip(&coverage) {
        if !covered {
            *out = OUTPUT_NODATA;
        }
    }

    ClassifiedRaster {
        output,
        coverage,
        width: band.width(),
        height: band.height(),
    }
}
