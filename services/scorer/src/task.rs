//! Task documents and result documents of the tool contract.

use std::path::Path;

use serde::{Deserialize, Serialize};

use raster_common::{ReclassError, ReclassResult};
use reclass_engine::{CoverageMetrics, CriteriaSpecs, RunReport};

pub const SUCCESS_MESSAGE: &str = "Tool Executed Successfully";
pub const FAILURE_MESSAGE: &str = "An error occurred during data processing.";
pub const FAILURE_STATUS: u16 = 500;

/// Object storage credentials of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinioSection {
    /// Access key ID
    pub id: String,
    /// Secret access key
    pub key: String,
    /// Session token
    #[serde(default)]
    pub skey: Option<String>,
    pub endpoint_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSection {
    /// Locations of every raster the criteria may refer to.
    pub rasters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Folder receiving the classified rasters and the combo.
    pub scored_files: String,
}

/// A scoring task as handed to the tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub minio: MinioSection,
    pub input: InputSection,
    pub output: OutputSection,
    /// Criteria per raster identifier, in document order.
    pub parameters: CriteriaSpecs,
}

impl TaskDocument {
    pub fn from_json(text: &str) -> ReclassResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ReclassError::config(format!("Invalid task document: {}", e)))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ReclassResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReclassError::config(format!("Cannot read task document {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Output folder without trailing slashes.
    pub fn output_folder(&self) -> &str {
        self.output.scored_files.trim_end_matches('/')
    }
}

/// First of `locations` ending with `identifier`.
pub fn resolve_location<'a>(locations: &'a [String], identifier: &str) -> Option<&'a str> {
    locations
        .iter()
        .map(String::as_str)
        .find(|location| location.ends_with(identifier))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultOutput {
    pub scored_files: String,
    /// Location of the combined raster, `null` when none was produced.
    pub combo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessResult {
    pub message: String,
    pub output: ResultOutput,
    pub metrics: CoverageMetrics,
    pub skipped: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureResult {
    pub message: String,
    pub error: String,
    pub status: u16,
}

/// The document written back after a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskResult {
    Success(SuccessResult),
    Failure(FailureResult),
}

impl TaskResult {
    pub fn success(report: RunReport, scored_files: impl Into<String>) -> Self {
        TaskResult::Success(SuccessResult {
            message: SUCCESS_MESSAGE.to_string(),
            output: ResultOutput {
                scored_files: scored_files.into(),
                combo: report.combo.location().map(str::to_string),
            },
            metrics: report.coverage,
            skipped: report.skipped,
            status: "success".to_string(),
        })
    }

    pub fn failure(err: &ReclassError) -> Self {
        TaskResult::Failure(FailureResult {
            message: FAILURE_MESSAGE.to_string(),
            error: format!("{}: {}", err.kind(), err),
            status: FAILURE_STATUS,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    pub fn to_json_pretty(&self) -> ReclassResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
