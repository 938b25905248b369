//! Connection settings for S3-compatible object storage.

use serde::{Deserialize, Serialize};

/// Configuration for object storage connections.
///
/// One configuration serves every bucket a run touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint, with or without scheme
    pub endpoint: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            session_token: None,
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

impl ObjectStorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            endpoint: std::env::var("S3_ENDPOINT").unwrap_or(defaults.endpoint),
            access_key_id: std::env::var("S3_ACCESS_KEY").unwrap_or(defaults.access_key_id),
            secret_access_key: std::env::var("S3_SECRET_KEY")
                .unwrap_or(defaults.secret_access_key),
            session_token: std::env::var("S3_SESSION_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            region: std::env::var("S3_REGION").unwrap_or(defaults.region),
            allow_http: std::env::var("S3_ALLOW_HTTP")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.allow_http),
        }
    }

    /// Config for explicit credentials, keeping region from `self`.
    ///
    /// An endpoint without scheme is reached over HTTPS; an `http://`
    /// endpoint enables plain HTTP.
    pub fn with_credentials(
        &self,
        endpoint: &str,
        access_key_id: &str,
        secret_access_key: &str,
        session_token: Option<&str>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.filter(|t| !t.is_empty()).map(str::to_string),
            region: self.region.clone(),
            allow_http: endpoint.starts_with("http://"),
        }
    }

    /// Endpoint URL with an explicit scheme.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            self.endpoint.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if self.endpoint_url().starts_with("http://") && !self.allow_http {
            return Err(format!(
                "endpoint {} uses plain HTTP but allow_http is false",
                self.endpoint
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObjectStorageConfig::default();
        assert_eq!(config.endpoint, "http://minio:9000");
        assert_eq!(config.region, "us-east-1");
        assert!(config.allow_http);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_without_scheme_uses_https() {
        let config = ObjectStorageConfig::default().with_credentials(
            "minio.example.org/",
            "id",
            "secret",
            Some("token"),
        );
        assert_eq!(config.endpoint_url(), "https://minio.example.org");
        assert!(!config.allow_http);
        assert_eq!(config.session_token.as_deref(), Some("token"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_endpoint_enables_plain_http() {
        let config =
            ObjectStorageConfig::default().with_credentials("http://localhost:9000", "id", "s", None);
        assert!(config.allow_http);
        assert_eq!(config.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    fn test_empty_session_token_is_dropped() {
        let config =
            ObjectStorageConfig::default().with_credentials("minio.example.org", "id", "s", Some(""));
        assert_eq!(config.session_token, None);
    }

    #[test]
    fn test_validate_rejects_http_without_permission() {
        let config = ObjectStorageConfig {
            endpoint: "http://minio:9000".to_string(),
            allow_http: false,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
