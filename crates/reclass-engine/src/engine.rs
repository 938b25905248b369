//! Run orchestration: fetch, classify, store and combine every raster.

use std::path::{Component, Path};

use raster_common::{GeoMetadata, RasterBand, ReclassError, ReclassResult};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::aggregator::{merge, ComboRaster};
use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::criteria::CriteriaTable;

/// Trait for anything that can hand out input bands by identifier.
pub trait BandSource {
    /// Load band 1 of the raster named `identifier`.
    ///
    /// # Returns
    /// * `Err(ReclassError::MissingInput)` if there is no such raster; the
    ///   engine skips the identifier and continues
    /// * any other error aborts the run
    fn fetch_band(&mut self, identifier: &str) -> ReclassResult<RasterBand>;
}

/// Borrowed pixels and metadata of a raster about to be persisted.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    pub values: &'a [f64],
    pub width: usize,
    pub height: usize,
    pub meta: &'a GeoMetadata,
}

/// Trait for the destination of classified and combined rasters.
pub trait RasterSink {
    /// Persist `raster` under the file name `name`.
    ///
    /// # Returns
    /// * the location the raster was written to
    fn store(&mut self, name: &str, raster: RasterView<'_>) -> ReclassResult<String>;
}

/// A classified raster that has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRaster {
    pub identifier: String,
    pub name: String,
    pub location: String,
}

/// What happened to the combined raster at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboOutcome {
    Produced { raster: ComboRaster, location: String },
    /// No identifier had a retrievable raster, so nothing was written.
    NotProduced,
}

impl ComboOutcome {
    pub fn location(&self) -> Option<&str> {
        match self {
            ComboOutcome::Produced { location, .. } => Some(location),
            ComboOutcome::NotProduced => None,
        }
    }

    pub fn is_produced(&self) -> bool {
        matches!(self, ComboOutcome::Produced { .. })
    }
}

/// Coverage percentage per processed identifier, in processing order.
///
/// Serializes as a map keyed `"<identifier>_coverage"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageMetrics(Vec<(String, f64)>);

impl CoverageMetrics {
    pub fn record(&mut self, identifier: impl Into<String>, coverage_pct: f64) {
        self.0.push((identifier.into(), coverage_pct));
    }

    pub fn get(&self, identifier: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, pct)| *pct)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, pct)| (id.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CoverageMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (identifier, pct) in &self.0 {
            map.serialize_entry(&format!("{}_coverage", identifier), pct)?;
        }
        map.end()
    }
}

/// Summary of one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub coverage: CoverageMetrics,
    /// Identifiers that had no retrievable raster.
    pub skipped: Vec<String>,
    pub classified: Vec<StoredRaster>,
    pub combo: ComboOutcome,
}

/// Output name for the classified raster of `identifier`.
///
/// The suffix goes between the file stem and the extension:
/// `slope.tif` becomes `slope_classified.tif`, `dem` becomes
/// `dem_classified`. Directories of the identifier are kept, so
/// `2023/slope.tif` becomes `2023/slope_classified.tif`. Root, `.` and `..`
/// components are dropped.
pub fn classified_name(identifier: &str, suffix: &str) -> String {
    let path = Path::new(identifier);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| identifier.to_string());

    let file = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    let mut parts: Vec<String> = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(file);
    parts.join("/")
}

/// Drives a reclassification run.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify every identifier of `criteria` in order and combine the
    /// results.
    ///
    /// Identifiers the source reports as missing are skipped. Any other error
    /// stops the run; outputs already stored stay where they are.
    pub fn run<S, K>(
        &self,
        criteria: &CriteriaTable,
        source: &mut S,
        sink: &mut K,
    ) -> ReclassResult<RunReport>
    where
        S: BandSource + ?Sized,
        K: RasterSink + ?Sized,
    {
        let mut combo: Option<ComboRaster> = None;
        let mut coverage = CoverageMetrics::default();
        let mut skipped = Vec::new();
        let mut classified_outputs = Vec::new();

        for (identifier, rules) in criteria.iter() {
            let band = match source.fetch_band(identifier) {
                Ok(band) => band,
                Err(ReclassError::MissingInput(_)) => {
                    warn!(identifier = %identifier, "Input raster not found, skipping");
                    skipped.push(identifier.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            debug!(
                identifier = %identifier,
                width = band.width(),
                height = band.height(),
                criteria = rules.len(),
                "Classifying raster"
            );

            let classified = classify(&band, rules);
            let coverage_pct = classified.coverage_pct();
            coverage.record(identifier, coverage_pct);

            let name = classified_name(identifier, &self.config.classified_suffix);
            let location = sink.store(
                &name,
                RasterView {
                    values: classified.output(),
                    width: classified.width(),
                    height: classified.height(),
                    meta: band.meta(),
                },
            )?;

            info!(
                identifier = %identifier,
                coverage_pct = coverage_pct,
                location = %location,
                "Stored classified raster"
            );

            classified_outputs.push(StoredRaster {
                identifier: identifier.to_string(),
                name,
                location,
            });

            combo = Some(merge(combo, &classified, band.meta())?);
        }

        let combo = match combo {
            Some(mut raster) => {
                if self.config.sanitize_nan {
                    let replaced = raster.sanitize_nan();
                    if replaced > 0 {
                        debug!(replaced = replaced, "Replaced NaN pixels in combined raster");
                    }
                }

                let location = sink.store(
                    &self.config.combo_name,
                    RasterView {
                        values: raster.values(),
                        width: raster.width(),
                        height: raster.height(),
                        meta: raster.meta(),
                    },
                )?;
                info!(location = %location, rasters = classified_outputs.len(), "Stored combined raster");

                ComboOutcome::Produced { raster, location }
            }
            None => {
                warn!("No raster processed, combined raster not created");
                ComboOutcome::NotProduced
            }
        };

        Ok(RunReport {
            coverage,
            skipped,
            classified: classified_outputs,
            combo,
        })
    }
}
