//! Scorer configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use reclass_engine::EngineConfig;
use storage::ObjectStorageConfig;

/// Top-level scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Output naming and combo finalization
    pub engine: EngineConfig,

    /// Object storage defaults; task documents override the credentials
    pub storage: ObjectStorageConfig,

    /// Parent of the per-run scratch directories
    pub workdir: PathBuf,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            storage: ObjectStorageConfig::default(),
            workdir: env::temp_dir().join("raster-scoring"),
        }
    }
}

impl ScorerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            engine: EngineConfig::from_env(),
            storage: ObjectStorageConfig::from_env(),
            workdir: env::var("SCORER_WORKDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("raster-scoring")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.engine
            .validate()
            .map_err(|e| anyhow!("invalid engine configuration: {}", e))?;

        if self.workdir.as_os_str().is_empty() {
            return Err(anyhow!("SCORER_WORKDIR must not be empty"));
        }

        Ok(())
    }
}
