//! Additive combination of classified rasters.

use raster_common::{GeoMetadata, ReclassError, ReclassResult, OUTPUT_NODATA};

use crate::classifier::ClassifiedRaster;

/// Running sum of every classified raster of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboRaster {
    values: Vec<f64>,
    width: usize,
    height: usize,
    meta: GeoMetadata,
}

impl ComboRaster {
    /// Start a combo from the first classified raster.
    ///
    /// Uncovered pixels start at 0 so later rasters can add into them. The
    /// metadata of the seeding raster becomes the combo's metadata.
    pub fn seed(classified: &ClassifiedRaster, meta: &GeoMetadata) -> Self {
        let values = classified
            .output()
            .iter()
            .map(|&v| if v == OUTPUT_NODATA { 0.0 } else { v })
            .collect();

        Self {
            values,
            width: classified.width(),
            height: classified.height(),
            meta: meta.clone(),
        }
    }

    /// Add every pixel of `classified` that is not [`OUTPUT_NODATA`].
    pub fn accumulate(&mut self, classified: &ClassifiedRaster) -> ReclassResult<()> {
        if classified.shape() != self.shape() {
            return Err(ReclassError::ShapeMismatch {
                expected: self.shape(),
                found: classified.shape(),
            });
        }

        for (acc, &v) in self.values.iter_mut().zip(classified.output()) {
            if v != OUTPUT_NODATA {
                *acc += v;
            }
        }
        Ok(())
    }

    /// Replace every NaN with 0 and return how many were replaced.
    pub fn sanitize_nan(&mut self) -> usize {
        let mut replaced = 0;
        for v in self.values.iter_mut().filter(|v| v.is_nan()) {
            *v = 0.0;
            replaced += 1;
        }
        replaced
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

    pub fn meta(&self) -> &GeoMetadata {
        &self.meta
    }
}

/// Fold `classified` into the running combo, seeding it when there is none yet.
pub fn merge(
    combo: Option<ComboRaster>,
    classified: &ClassifiedRaster,
    meta: &GeoMetadata,
) -> ReclassResult<ComboRaster> {
    match combo {
        None => Ok(ComboRaster::seed(classified, meta)),
        Some(mut combo) => {
            combo.accumulate(classified)?;
            Ok(combo)
        }
    }
}
