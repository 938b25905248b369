//! Threshold reclassification of raster bands.
//!
//! Each input band is reclassified by a list of inclusive `[val_min, val_max]`
//! rules; matching rules add their `new_val`, unmatched pixels become
//! [`OUTPUT_NODATA`](raster_common::OUTPUT_NODATA). Every classified raster is
//! then summed into one combined raster.
//!
//! The [`Engine`] is I/O agnostic: rasters come from a [`BandSource`] and go
//! to a [`RasterSink`].
//!
//! # Example
//!
//! ```ignore
//! use reclass_engine::{CriteriaTable, Engine, EngineConfig};
//!
//! let criteria = CriteriaTable::from_csv_path("criteria.csv")?;
//! let report = Engine::new(EngineConfig::default()).run(&criteria, &mut source, &mut sink)?;
//! println!("{:?}", report.combo.location());
//! ```

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod criteria;
pub mod engine;

pub use aggregator::{merge, ComboRaster};
pub use classifier::{classify, ClassifiedRaster};
pub use config::EngineConfig;
pub use criteria::{
    CriteriaSet, CriteriaSpec, CriteriaSpecs, CriteriaTable, Criterion, NumericValue, RawCriterion,
};
pub use engine::{
    classified_name, BandSource, ComboOutcome, CoverageMetrics, Engine, RasterSink, RasterView,
    RunReport, StoredRaster,
};
