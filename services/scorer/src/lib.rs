//! Raster scoring tool.
//!
//! Runs the reclassification engine either on a JSON task whose rasters live
//! in S3-compatible object storage, or on a CSV criteria table over local
//! directories.

pub mod config;
pub mod pipeline;
pub mod sources;
pub mod task;

pub use config::ScorerConfig;
pub use pipeline::{into_result, run_local, run_task, run_task_with};
pub use task::{TaskDocument, TaskResult};
