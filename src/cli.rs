//! Command line arguments and configuration resolution.

use std::path::PathBuf;

use clap::Parser;
use inventory_mcp::{InventoryConfig, InventoryResult};

#[derive(Debug, Parser)]
#[command(
    name = "aws-inventory-mcp",
    version,
    about = "MCP server exposing read-only AWS resource inventory tools over stdio"
)]
pub struct Cli {
    /// YAML configuration file. Flags below override its values.
    #[arg(long, env = "INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// AWS region every call targets
    #[arg(long, env = "INVENTORY_AWS_REGION")]
    pub region: Option<String>,

    /// Named AWS profile
    #[arg(long, env = "INVENTORY_AWS_PROFILE")]
    pub profile: Option<String>,

    /// Endpoint override, e.g. http://localhost:4566
    #[arg(long, env = "INVENTORY_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Resources enriched concurrently
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Deadline for each describe sub-call, in milliseconds
    #[arg(long)]
    pub sub_call_timeout_ms: Option<u64>,

    /// Return enrichment warnings alongside tool results
    #[arg(long)]
    pub include_warnings: bool,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info", env = "INVENTORY_LOG_LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// File (or defaults), then flag overrides, then validation.
    pub fn resolve_config(&self) -> InventoryResult<InventoryConfig> {
        let mut config = match &self.config {
            Some(path) => InventoryConfig::from_yaml_file(path)?,
            None => InventoryConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut InventoryConfig) {
        if let Some(region) = &self.region {
            config.aws.region = region.clone();
        }
        if let Some(profile) = &self.profile {
            config.aws.profile = Some(profile.clone());
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            config.aws.endpoint_url = Some(endpoint_url.clone());
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.enrichment.max_concurrency = max_concurrency;
        }
        if let Some(timeout_ms) = self.sub_call_timeout_ms {
            config.enrichment.sub_call_timeout_ms = Some(timeout_ms);
        }
        if self.include_warnings {
            config.diagnostics.include_warnings = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use inventory_mcp::InventoryError;
    use serial_test::serial;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aws-inventory-mcp").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    #[serial]
    fn test_defaults_without_arguments() {
        let cli = parse(&[]);
        assert_eq!(cli.log_level, "info");

        let config = cli.resolve_config().unwrap();
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    #[serial]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "aws:\n  region: eu-west-1\nenrichment:\n  max_concurrency: 2"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&[
            "--config",
            &path,
            "--region",
            "us-west-2",
            "--sub-call-timeout-ms",
            "750",
            "--include-warnings",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.aws.region, "us-west-2");
        assert_eq!(config.enrichment.max_concurrency, 2);
        assert_eq!(config.enrichment.sub_call_timeout_ms, Some(750));
        assert!(config.diagnostics.include_warnings);
    }

    #[test]
    #[serial]
    fn test_region_from_environment() {
        std::env::set_var("INVENTORY_AWS_REGION", "ca-central-1");
        let cli = parse(&[]);
        std::env::remove_var("INVENTORY_AWS_REGION");

        assert_eq!(cli.resolve_config().unwrap().aws.region, "ca-central-1");
    }

    #[test]
    #[serial]
    fn test_invalid_override_fails_validation() {
        let cli = parse(&["--max-concurrency", "0"]);
        assert!(matches!(
            cli.resolve_config(),
            Err(InventoryError::Config(_))
        ));
    }
}
