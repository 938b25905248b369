//! Object locations of the form `s3://bucket/key` or `bucket/key`.

use std::fmt;
use std::str::FromStr;

use raster_common::{ReclassError, ReclassResult};

const SCHEME: &str = "s3://";

/// A bucket plus an object key inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct S3Location {
    bucket: String,
    key: String,
}

impl S3Location {
    /// Parse `s3://bucket/key` or `bucket/key`.
    ///
    /// Both the bucket and the key must be non-empty.
    pub fn parse(location: &str) -> ReclassResult<Self> {
        let path = location.strip_prefix(SCHEME).unwrap_or(location);

        match path.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            _ => Err(ReclassError::transfer(format!(
                "Invalid location '{}': expected 's3://bucket/key' or 'bucket/key'",
                location
            ))),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Location of `name` inside this location treated as a folder.
    pub fn join(&self, name: &str) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: format!("{}/{}", self.key.trim_end_matches('/'), name),
        }
    }
}

impl FromStr for S3Location {
    type Err = ReclassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.bucket, self.key)
    }
}
