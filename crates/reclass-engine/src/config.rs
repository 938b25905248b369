//! Configuration for the reclassification engine.

use serde::{Deserialize, Serialize};

/// Configuration for the reclassification engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Appended to the file stem of each input to name its classified output.
    pub classified_suffix: String,

    /// File name of the combined raster.
    pub combo_name: String,

    /// Replace NaN pixels of the combined raster with 0 before it is stored.
    pub sanitize_nan: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classified_suffix: "_classified".to_string(),
            combo_name: "COMBO_OUT.tif".to_string(),
            sanitize_nan: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RECLASS_CLASSIFIED_SUFFIX") {
            config.classified_suffix = val;
        }

        if let Ok(val) = std::env::var("RECLASS_COMBO_NAME") {
            config.combo_name = val;
        }

        if let Ok(val) = std::env::var("RECLASS_SANITIZE_NAN") {
            config.sanitize_nan = parse_flag(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.combo_name.trim().is_empty() {
            return Err("combo_name must not be empty".to_string());
        }

        if self.classified_suffix.is_empty() {
            return Err(
                "classified_suffix must not be empty (outputs would overwrite their inputs)"
                    .to_string(),
            );
        }

        if self.combo_name.contains('/') {
            return Err("combo_name must be a bare file name".to_string());
        }

        Ok(())
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
