//! Error types for raster scoring.

use thiserror::Error;

/// Result type alias using ReclassError.
pub type ReclassResult<T> = Result<T, ReclassError>;

/// Primary error type for reclassification runs.
#[derive(Debug, Error)]
pub enum ReclassError {
    // === Input Errors ===
    /// An identifier named in the criteria has no retrievable raster.
    #[error("Missing input raster: {0}")]
    MissingInput(String),

    #[error("Malformed criteria for '{identifier}': {message}")]
    MalformedCriteria { identifier: String, message: String },

    // === Transfer / Codec Errors ===
    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Raster codec error: {0}")]
    Codec(String),

    // === Raster Errors ===
    #[error("Raster shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{len} values do not fill a {width}x{height} raster")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ReclassError {
    /// Create a Transfer error.
    pub fn transfer(msg: impl Into<String>) -> Self {
        Self::Transfer(msg.into())
    }

    /// Create a Codec error.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a MalformedCriteria error.
    pub fn malformed_criteria(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCriteria {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the run.
    ///
    /// Only a missing input is recoverable: the identifier is skipped and the
    /// run continues with the next one.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReclassError::MissingInput(_))
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ReclassError::MissingInput(_) => "missing_input",
            ReclassError::MalformedCriteria { .. } => "malformed_criteria",
            ReclassError::Transfer(_) => "transfer",
            ReclassError::Codec(_) => "codec",
            ReclassError::ShapeMismatch { .. } => "shape_mismatch",
            ReclassError::InvalidDimensions { .. } => "invalid_dimensions",
            ReclassError::Config(_) => "config",
            ReclassError::Io(_) => "io",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for ReclassError {
    fn from(err: std::io::Error) -> Self {
        ReclassError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReclassError {
    fn from(err: serde_json::Error) -> Self {
        ReclassError::Config(format!("JSON error: {}", err))
    }
}
