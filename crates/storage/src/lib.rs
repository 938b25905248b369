//! Storage plumbing for raster scoring runs.
//!
//! Provides:
//! - Parsing of `s3://bucket/key` locations
//! - Synchronous fetch/store over S3-compatible object storage (MinIO)
//! - Local scratch directories for transferred files

pub mod config;
pub mod location;
pub mod scratch;
pub mod transfer;

pub use config::ObjectStorageConfig;
pub use location::S3Location;
pub use scratch::ScratchDirs;
pub use transfer::ObjectTransfer;

/// Backends that can be registered per bucket.
pub use object_store::{local::LocalFileSystem, memory::InMemory, ObjectStore};
