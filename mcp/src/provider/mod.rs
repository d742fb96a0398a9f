//! Provider client facade.
//!
//! One trait per resource kind: a list call that yields the identifier set,
//! plus one describe call per fragment. Calls are independent reads and may
//! be issued concurrently for different identifiers.

pub mod aws;

use std::{collections::BTreeMap, fmt, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use self::aws::AwsProvider;
use crate::aggregate::{
    BucketSummary, EncryptionRule, KeyMetadata, PublicAccessBlock, TableDescription,
};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Named provider operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    ListTables,
    DescribeTable,
    ListKeys,
    DescribeKey,
    ListBuckets,
    GetBucketLocation,
    GetBucketVersioning,
    GetBucketEncryption,
    GetPublicAccessBlock,
    GetBucketTagging,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListTables => "ListTables",
            Operation::DescribeTable => "DescribeTable",
            Operation::ListKeys => "ListKeys",
            Operation::DescribeKey => "DescribeKey",
            Operation::ListBuckets => "ListBuckets",
            Operation::GetBucketLocation => "GetBucketLocation",
            Operation::GetBucketVersioning => "GetBucketVersioning",
            Operation::GetBucketEncryption => "GetBucketEncryption",
            Operation::GetPublicAccessBlock => "GetPublicAccessBlock",
            Operation::GetBucketTagging => "GetBucketTagging",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed provider call, with the operation and identifier it concerned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{operation} failed{}: {message}",
    .resource.as_deref().map(|r| format!(" for '{r}'")).unwrap_or_default()
)]
pub struct ProviderError {
    pub operation: Operation,
    pub resource: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(
        operation: Operation,
        resource: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            resource: resource.map(str::to_string),
            message: message.into(),
        }
    }

    /// The call succeeded but carried no body for the requested fragment.
    pub fn empty_response(operation: Operation, resource: &str) -> Self {
        Self::new(operation, Some(resource), "response carried no payload")
    }

    pub fn timed_out(operation: Operation, resource: &str, limit: Duration) -> Self {
        Self::new(
            operation,
            Some(resource),
            format!("timed out after {}ms", limit.as_millis()),
        )
    }
}

#[async_trait]
pub trait TableProvider: Send + Sync {
    async fn list_tables(&self) -> ProviderResult<Vec<String>>;

    async fn describe_table(&self, table_name: &str) -> ProviderResult<TableDescription>;
}

#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn list_keys(&self) -> ProviderResult<Vec<String>>;

    async fn describe_key(&self, key_id: &str) -> ProviderResult<KeyMetadata>;
}

#[async_trait]
pub trait BucketProvider: Send + Sync {
    async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>>;

    /// Region the bucket lives in.
    async fn bucket_location(&self, bucket: &str) -> ProviderResult<String>;

    /// Versioning status; empty when versioning was never configured.
    async fn bucket_versioning(&self, bucket: &str) -> ProviderResult<String>;

    async fn bucket_encryption(&self, bucket: &str) -> ProviderResult<Vec<EncryptionRule>>;

    async fn public_access_block(&self, bucket: &str) -> ProviderResult<PublicAccessBlock>;

    async fn bucket_tagging(&self, bucket: &str) -> ProviderResult<BTreeMap<String, String>>;
}

/// Every capability the aggregation engine consumes.
pub trait CloudProvider: TableProvider + KeyProvider + BucketProvider {}

impl<T: TableProvider + KeyProvider + BucketProvider> CloudProvider for T {}
