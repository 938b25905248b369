//! Band sources and raster sinks backed by object storage or local folders.

use std::path::{Path, PathBuf};

use tracing::debug;

use geotiff_codec::{read_geotiff, write_geotiff, OutputRaster};
use raster_common::{RasterBand, ReclassError, ReclassResult, OUTPUT_NODATA};
use reclass_engine::{BandSource, RasterSink, RasterView};
use storage::{ObjectTransfer, S3Location, ScratchDirs};

use crate::task::resolve_location;

/// Reads inputs listed in a task, downloading each into scratch first.
pub struct ObjectStoreSource<'a> {
    transfer: &'a ObjectTransfer,
    rasters: &'a [String],
    scratch: &'a ScratchDirs,
}

impl<'a> ObjectStoreSource<'a> {
    pub fn new(transfer: &'a ObjectTransfer, rasters: &'a [String], scratch: &'a ScratchDirs) -> Self {
        Self {
            transfer,
            rasters,
            scratch,
        }
    }
}

impl BandSource for ObjectStoreSource<'_> {
    fn fetch_band(&mut self, identifier: &str) -> ReclassResult<RasterBand> {
        let location = resolve_location(self.rasters, identifier)
            .ok_or_else(|| ReclassError::MissingInput(identifier.to_string()))?;

        let location = S3Location::parse(location)?;
        let local = self.scratch.input_path(identifier);
        self.transfer.fetch(&location, &local)?;

        read_geotiff(&local)
    }
}

/// Encodes outputs into scratch and uploads them below a folder location.
pub struct ObjectStoreSink<'a> {
    transfer: &'a ObjectTransfer,
    folder: &'a str,
    scratch: &'a ScratchDirs,
}

impl<'a> ObjectStoreSink<'a> {
    /// `folder` is `s3://bucket[/prefix]` without trailing slash.
    pub fn new(transfer: &'a ObjectTransfer, folder: &'a str, scratch: &'a ScratchDirs) -> Self {
        Self {
            transfer,
            folder,
            scratch,
        }
    }
}

impl RasterSink for ObjectStoreSink<'_> {
    fn store(&mut self, name: &str, raster: RasterView<'_>) -> ReclassResult<String> {
        let local = self.scratch.output_path(name);
        write_output(&local, &raster)?;

        let target = format!("{}/{}", self.folder, name);
        self.transfer.store(&S3Location::parse(&target)?, &local)?;
        Ok(target)
    }
}

/// Reads inputs from a local directory by file name.
pub struct LocalDirSource {
    dir: PathBuf,
}

impl LocalDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BandSource for LocalDirSource {
    fn fetch_band(&mut self, identifier: &str) -> ReclassResult<RasterBand> {
        let path = self.dir.join(identifier);
        if !path.is_file() {
            return Err(ReclassError::MissingInput(identifier.to_string()));
        }
        read_geotiff(&path)
    }
}

/// Writes outputs into a local directory, creating it if missing.
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn create(dir: impl Into<PathBuf>) -> ReclassResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ReclassError::Io(format!("Cannot create output dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }
}

impl RasterSink for LocalDirSink {
    fn store(&mut self, name: &str, raster: RasterView<'_>) -> ReclassResult<String> {
        let path = self.dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_output(&path, &raster)?;
        Ok(path.display().to_string())
    }
}

fn write_output(path: &Path, raster: &RasterView<'_>) -> ReclassResult<()> {
    debug!(path = %path.display(), width = raster.width, height = raster.height, "Encoding raster");
    write_geotiff(
        &OutputRaster::new(
            raster.values,
            raster.width,
            raster.height,
            raster.meta,
            OUTPUT_NODATA,
        ),
        path,
    )
}
