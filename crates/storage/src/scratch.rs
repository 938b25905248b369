//! Local scratch space for downloaded inputs and encoded outputs.

use std::path::{Path, PathBuf};

use raster_common::{ReclassError, ReclassResult};

/// `in/` and `out/` directories under a work directory.
#[derive(Debug, Clone)]
pub struct ScratchDirs {
    root: PathBuf,
    input: PathBuf,
    output: PathBuf,
}

impl ScratchDirs {
    /// Create (if missing) `in/` and `out/` under `root`.
    pub fn create(root: impl Into<PathBuf>) -> ReclassResult<Self> {
        let root = root.into();
        let input = root.join("in");
        let output = root.join("out");

        for dir in [&input, &output] {
            std::fs::create_dir_all(dir).map_err(|e| {
                ReclassError::Io(format!("Cannot create scratch dir {}: {}", dir.display(), e))
            })?;
        }

        Ok(Self {
            root,
            input,
            output,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scratch path of a downloaded input.
    pub fn input_path(&self, name: &str) -> PathBuf {
        self.input.join(file_name(name))
    }

    /// Scratch path of an encoded output.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output.join(file_name(name))
    }
}

/// Final component of `name`, so nested identifiers stay inside scratch.
fn file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_in_and_out() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDirs::create(dir.path().join("work")).unwrap();

        assert!(dir.path().join("work/in").is_dir());
        assert!(dir.path().join("work/out").is_dir());
        assert_eq!(
            scratch.input_path("slope.tif"),
            dir.path().join("work/in/slope.tif")
        );
    }

    #[test]
    fn test_nested_names_stay_inside() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDirs::create(dir.path()).unwrap();

        assert_eq!(
            scratch.output_path("../../etc/slope_classified.tif"),
            dir.path().join("out/slope_classified.tif")
        );
    }

    #[test]
    fn test_existing_dirs_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        ScratchDirs::create(dir.path()).unwrap();
        assert!(ScratchDirs::create(dir.path()).is_ok());
    }
}
