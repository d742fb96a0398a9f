//! AWS SDK implementation of the provider traits.
//!
//! One SDK config is resolved at construction (region, profile, endpoint) and
//! shared by the DynamoDB, KMS, and S3 clients. Nothing is cached between
//! calls.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::{
    config::Region,
    error::DisplayErrorContext,
    primitives::DateTime as AwsDateTime,
    types::{
        BucketLocationConstraint, BucketVersioningStatus, PublicAccessBlockConfiguration,
        ServerSideEncryptionConfiguration,
    },
};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{BucketProvider, KeyProvider, Operation, ProviderError, ProviderResult, TableProvider};
use crate::{
    aggregate::{
        BillingModeSummary, BucketSummary, DefaultEncryption, EncryptionRule, KeyMetadata,
        PublicAccessBlock, TableDescription,
    },
    core::config::AwsConfig,
};

/// S3 reports an empty location constraint for buckets in this region.
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

fn sdk_error<E: std::error::Error>(
    operation: Operation,
    resource: Option<&str>,
    err: E,
) -> ProviderError {
    ProviderError::new(operation, resource, DisplayErrorContext(&err).to_string())
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn key_metadata(
    metadata: Option<&aws_sdk_kms::types::KeyMetadata>,
    key_id: &str,
) -> ProviderResult<KeyMetadata> {
    let metadata =
        metadata.ok_or_else(|| ProviderError::empty_response(Operation::DescribeKey, key_id))?;

    Ok(KeyMetadata {
        arn: metadata.arn().map(str::to_string),
        creation_date: metadata.creation_date().and_then(to_utc),
        description: metadata.description().map(str::to_string),
        enabled: metadata.enabled(),
        key_state: metadata.key_state().map(|s| s.as_str().to_string()),
        key_manager: metadata.key_manager().map(|m| m.as_str().to_string()),
        key_usage: metadata.key_usage().map(|u| u.as_str().to_string()),
    })
}

fn region_from_constraint(constraint: Option<&BucketLocationConstraint>) -> String {
    constraint
        .map(BucketLocationConstraint::as_str)
        .filter(|constraint| !constraint.is_empty())
        .unwrap_or(DEFAULT_BUCKET_REGION)
        .to_string()
}

fn versioning_status(status: Option<&BucketVersioningStatus>) -> String {
    status
        .map(|status| status.as_str().to_string())
        .unwrap_or_default()
}

fn encryption_rules(
    configuration: Option<&ServerSideEncryptionConfiguration>,
    bucket: &str,
) -> ProviderResult<Vec<EncryptionRule>> {
    let configuration = configuration
        .ok_or_else(|| ProviderError::empty_response(Operation::GetBucketEncryption, bucket))?;

    Ok(configuration
        .rules()
        .iter()
        .map(|rule| EncryptionRule {
            default_encryption: rule.apply_server_side_encryption_by_default().map(|default| {
                DefaultEncryption {
                    sse_algorithm: default.sse_algorithm().as_str().to_string(),
                    kms_master_key_id: default.kms_master_key_id().map(str::to_string),
                }
            }),
            bucket_key_enabled: rule.bucket_key_enabled(),
        })
        .collect())
}

fn public_access_block_from(
    configuration: Option<&PublicAccessBlockConfiguration>,
    bucket: &str,
) -> ProviderResult<PublicAccessBlock> {
    let configuration = configuration
        .ok_or_else(|| ProviderError::empty_response(Operation::GetPublicAccessBlock, bucket))?;

    Ok(PublicAccessBlock {
        block_public_acls: configuration.block_public_acls(),
        block_public_policy: configuration.block_public_policy(),
        ignore_public_acls: configuration.ignore_public_acls(),
        restrict_public_buckets: configuration.restrict_public_buckets(),
    })
}

#[derive(Debug, Clone)]
pub struct AwsProvider {
    dynamodb: aws_sdk_dynamodb::Client,
    kms: aws_sdk_kms::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsProvider {
    /// Resolve credentials and region once and build all clients from them.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        debug!(
            region = %config.region,
            profile = ?config.profile,
            endpoint_url = ?config.endpoint_url,
            "Resolved AWS configuration"
        );

        // Custom endpoints (local emulators) rarely support virtual-hosted buckets
        Self::from_sdk_config(&sdk_config, config.endpoint_url.is_some())
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();

        Self {
            dynamodb: aws_sdk_dynamodb::Client::new(sdk_config),
            kms: aws_sdk_kms::Client::new(sdk_config),
            s3: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl TableProvider for AwsProvider {
    async fn list_tables(&self) -> ProviderResult<Vec<String>> {
        let output = self
            .dynamodb
            .list_tables()
            .send()
            .await
            .map_err(|e| sdk_error(Operation::ListTables, None, e))?;

        Ok(output.table_names().to_vec())
    }

    async fn describe_table(&self, table_name: &str) -> ProviderResult<TableDescription> {
        let output = self
            .dynamodb
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::DescribeTable, Some(table_name), e))?;

        let table = output
            .table()
            .ok_or_else(|| ProviderError::empty_response(Operation::DescribeTable, table_name))?;

        Ok(TableDescription {
            created_date: table.creation_date_time().and_then(to_utc),
            size_bytes: table.table_size_bytes(),
            pricing_model: table
                .billing_mode_summary()
                .map(|summary| BillingModeSummary {
                    billing_mode: summary.billing_mode().map(|mode| mode.as_str().to_string()),
                    last_update_to_pay_per_request_date_time: summary
                        .last_update_to_pay_per_request_date_time()
                        .and_then(to_utc),
                }),
        })
    }
}

#[async_trait]
impl KeyProvider for AwsProvider {
    async fn list_keys(&self) -> ProviderResult<Vec<String>> {
        let output = self
            .kms
            .list_keys()
            .send()
            .await
            .map_err(|e| sdk_error(Operation::ListKeys, None, e))?;

        Ok(output
            .keys()
            .iter()
            .filter_map(|entry| entry.key_id().map(str::to_string))
            .collect())
    }

    async fn describe_key(&self, key_id: &str) -> ProviderResult<KeyMetadata> {
        let output = self
            .kms
            .describe_key()
            .key_id(key_id)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::DescribeKey, Some(key_id), e))?;

        key_metadata(output.key_metadata(), key_id)
    }
}

#[async_trait]
impl BucketProvider for AwsProvider {
    async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>> {
        let output = self
            .s3
            .list_buckets()
            .send()
            .await
            .map_err(|e| sdk_error(Operation::ListBuckets, None, e))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                bucket
                    .name()
                    .map(|name| BucketSummary::new(name, bucket.creation_date().and_then(to_utc)))
            })
            .collect())
    }

    async fn bucket_location(&self, bucket: &str) -> ProviderResult<String> {
        let output = self
            .s3
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::GetBucketLocation, Some(bucket), e))?;

        Ok(region_from_constraint(output.location_constraint()))
    }

    async fn bucket_versioning(&self, bucket: &str) -> ProviderResult<String> {
        let output = self
            .s3
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::GetBucketVersioning, Some(bucket), e))?;

        Ok(versioning_status(output.status()))
    }

    async fn bucket_encryption(&self, bucket: &str) -> ProviderResult<Vec<EncryptionRule>> {
        let output = self
            .s3
            .get_bucket_encryption()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::GetBucketEncryption, Some(bucket), e))?;

        encryption_rules(output.server_side_encryption_configuration(), bucket)
    }

    async fn public_access_block(&self, bucket: &str) -> ProviderResult<PublicAccessBlock> {
        let output = self
            .s3
            .get_public_access_block()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::GetPublicAccessBlock, Some(bucket), e))?;

        public_access_block_from(output.public_access_block_configuration(), bucket)
    }

    async fn bucket_tagging(&self, bucket: &str) -> ProviderResult<BTreeMap<String, String>> {
        let output = self
            .s3
            .get_bucket_tagging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error(Operation::GetBucketTagging, Some(bucket), e))?;

        Ok(output
            .tag_set()
            .iter()
            .map(|tag| (tag.key().to_string(), tag.value().to_string()))
            .collect())
    }
}
