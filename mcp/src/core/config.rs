//! Inventory server configuration.
//!
//! Defines the AWS connection settings, enrichment bounds, and diagnostics
//! options. Every field has a default, so an empty YAML document is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InventoryConfig {
    /// Where and as whom provider calls are made
    #[serde(default)]
    pub aws: AwsConfig,

    /// Fan-out bounds for describe sub-calls
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Whether enrichment warnings are returned to callers
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// AWS connection settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AwsConfig {
    /// Operating region for every call
    #[serde(default = "default_region")]
    pub region: String,

    /// Named profile from the shared config files.
    /// Default credential chain when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Endpoint override (e.g. a local emulator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    /// Resources enriched concurrently
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per sub-call deadline (milliseconds). A sub-call still pending at the
    /// deadline is treated as failed and its fragment omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_call_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagnosticsConfig {
    /// Attach `{"warnings": [...]}` as a second content item on tool results.
    /// Warnings are logged either way.
    #[serde(default)]
    pub include_warnings: bool,
}

/// Invalid values in an otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("aws.region must not be empty")]
    EmptyRegion,

    #[error("aws.endpoint_url must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),

    #[error("enrichment.max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("enrichment.sub_call_timeout_ms must be greater than 0")]
    ZeroTimeout,
}

impl From<ConfigValidationError> for InventoryError {
    fn from(err: ConfigValidationError) -> Self {
        InventoryError::Config(err.to_string())
    }
}

// Default value functions
fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_concurrency() -> usize {
    16
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            profile: None,
            endpoint_url: None,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            sub_call_timeout_ms: None,
        }
    }
}

impl EnrichmentConfig {
    pub fn default_max_concurrency() -> usize {
        default_max_concurrency()
    }
}

impl InventoryConfig {
    pub fn from_yaml_str(yaml: &str) -> InventoryResult<Self> {
        // An empty file parses as YAML null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.aws.region.trim().is_empty() {
            return Err(ConfigValidationError::EmptyRegion);
        }

        if let Some(url) = &self.aws.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigValidationError::InvalidEndpoint(url.clone()));
            }
        }

        if self.enrichment.max_concurrency == 0 {
            return Err(ConfigValidationError::ZeroConcurrency);
        }

        if self.enrichment.sub_call_timeout_ms == Some(0) {
            return Err(ConfigValidationError::ZeroTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = InventoryConfig::default();
        assert_eq!(config.aws.region, "us-east-1");
        assert!(config.aws.profile.is_none());
        assert_eq!(config.enrichment.max_concurrency, 16);
        assert!(config.enrichment.sub_call_timeout_ms.is_none());
        assert!(!config.diagnostics.include_warnings);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = InventoryConfig::from_yaml_str("  \n").expect("empty yaml");
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    fn test_yaml_partial_config() {
        let yaml = r#"
aws:
  profile: "audit"
enrichment:
  sub_call_timeout_ms: 2500
"#;

        let config = InventoryConfig::from_yaml_str(yaml).expect("Failed to parse YAML");
        assert_eq!(config.aws.region, "us-east-1"); // Should use default
        assert_eq!(config.aws.profile.as_deref(), Some("audit"));
        assert_eq!(config.enrichment.max_concurrency, 16); // Should use default
        assert_eq!(config.enrichment.sub_call_timeout_ms, Some(2500));
    }

    #[test]
    fn test_yaml_full_config() {
        let yaml = r#"
aws:
  region: "eu-west-1"
  endpoint_url: "http://localhost:4566"
enrichment:
  max_concurrency: 4
diagnostics:
  include_warnings: true
"#;

        let config = InventoryConfig::from_yaml_str(yaml).expect("Failed to parse YAML");
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(
            config.aws.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(config.enrichment.max_concurrency, 4);
        assert!(config.diagnostics.include_warnings);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let yaml = "enrichment:\n  max_concurrency: many\n";
        let err = InventoryConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, InventoryError::Yaml(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = InventoryConfig::default();
        config.enrichment.max_concurrency = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroConcurrency)
        );

        let mut config = InventoryConfig::default();
        config.aws.region = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyRegion));

        let mut config = InventoryConfig::default();
        config.aws.endpoint_url = Some("localhost:4566".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidEndpoint(_))
        ));

        let mut config = InventoryConfig::default();
        config.enrichment.sub_call_timeout_ms = Some(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroTimeout));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "aws:\n  region: ap-south-1").expect("write");

        let config = InventoryConfig::from_yaml_file(file.path()).expect("load");
        assert_eq!(config.aws.region, "ap-south-1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = InventoryConfig::from_yaml_file("/nonexistent/inventory.yaml").unwrap_err();
        assert!(matches!(err, InventoryError::Io(_)));
    }
}
