//! Common test utilities for inventory tests
//!
//! [`MockProvider`] serves a scripted account: fixed listings, deterministic
//! describe payloads, and per-call failures or delays.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use inventory_mcp::{
    aggregate::{
        BillingModeSummary, BucketSummary, DefaultEncryption, EncryptionRule, KeyMetadata,
        PublicAccessBlock, TableDescription,
    },
    AggregationEngine, BucketProvider, EnrichmentPolicy, KeyProvider, Operation, ProviderError,
    ProviderResult, TableProvider,
};

pub fn fixed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
}

#[derive(Default)]
pub struct MockProvider {
    tables: Vec<String>,
    keys: Vec<String>,
    buckets: Vec<String>,
    failing: HashSet<(Operation, Option<String>)>,
    delays: HashMap<(Operation, String), Duration>,
    calls: Mutex<Vec<(Operation, Option<String>)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, names: &[&str]) -> Self {
        self.tables = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_keys(mut self, ids: &[&str]) -> Self {
        self.keys = ids.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_buckets(mut self, names: &[&str]) -> Self {
        self.buckets = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Make a list call fail.
    pub fn failing_list(mut self, operation: Operation) -> Self {
        self.failing.insert((operation, None));
        self
    }

    /// Make one describe call fail for one resource.
    pub fn failing(mut self, operation: Operation, resource: &str) -> Self {
        self.failing.insert((operation, Some(resource.to_string())));
        self
    }

    pub fn delayed(mut self, operation: Operation, resource: &str, delay: Duration) -> Self {
        self.delays
            .insert((operation, resource.to_string()), delay);
        self
    }

    pub fn calls(&self) -> Vec<(Operation, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn into_engine(self, policy: EnrichmentPolicy) -> AggregationEngine {
        AggregationEngine::new(Arc::new(self), policy)
    }

    async fn call<T>(
        &self,
        operation: Operation,
        resource: Option<&str>,
        value: impl FnOnce() -> T,
    ) -> ProviderResult<T> {
        self.calls
            .lock()
            .unwrap()
            .push((operation, resource.map(str::to_string)));

        if let Some(resource) = resource {
            if let Some(delay) = self.delays.get(&(operation, resource.to_string())) {
                tokio::time::sleep(*delay).await;
            }
        }

        if self
            .failing
            .contains(&(operation, resource.map(str::to_string)))
        {
            return Err(ProviderError::new(operation, resource, "AccessDenied"));
        }
        Ok(value())
    }
}

#[async_trait]
impl TableProvider for MockProvider {
    async fn list_tables(&self) -> ProviderResult<Vec<String>> {
        self.call(Operation::ListTables, None, || self.tables.clone())
            .await
    }

    async fn describe_table(&self, table_name: &str) -> ProviderResult<TableDescription> {
        self.call(Operation::DescribeTable, Some(table_name), || {
            TableDescription {
                created_date: Some(fixed_date()),
                size_bytes: Some(table_name.len() as i64 * 1024),
                pricing_model: Some(BillingModeSummary {
                    billing_mode: Some("PAY_PER_REQUEST".to_string()),
                    last_update_to_pay_per_request_date_time: None,
                }),
            }
        })
        .await
    }
}

#[async_trait]
impl KeyProvider for MockProvider {
    async fn list_keys(&self) -> ProviderResult<Vec<String>> {
        self.call(Operation::ListKeys, None, || self.keys.clone())
            .await
    }

    async fn describe_key(&self, key_id: &str) -> ProviderResult<KeyMetadata> {
        self.call(Operation::DescribeKey, Some(key_id), || KeyMetadata {
            arn: Some(format!("arn:aws:kms:us-east-1:111122223333:key/{key_id}")),
            creation_date: Some(fixed_date()),
            description: Some(format!("key {key_id}")),
            enabled: true,
            key_state: Some("Enabled".to_string()),
            key_manager: Some("CUSTOMER".to_string()),
            key_usage: Some("ENCRYPT_DECRYPT".to_string()),
        })
        .await
    }
}

#[async_trait]
impl BucketProvider for MockProvider {
    async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>> {
        self.call(Operation::ListBuckets, None, || {
            self.buckets
                .iter()
                .map(|name| BucketSummary::new(name.as_str(), Some(fixed_date())))
                .collect()
        })
        .await
    }

    async fn bucket_location(&self, bucket: &str) -> ProviderResult<String> {
        self.call(Operation::GetBucketLocation, Some(bucket), || {
            "us-west-2".to_string()
        })
        .await
    }

    async fn bucket_versioning(&self, bucket: &str) -> ProviderResult<String> {
        self.call(Operation::GetBucketVersioning, Some(bucket), || {
            "Enabled".to_string()
        })
        .await
    }

    async fn bucket_encryption(&self, bucket: &str) -> ProviderResult<Vec<EncryptionRule>> {
        self.call(Operation::GetBucketEncryption, Some(bucket), || {
            vec![EncryptionRule {
                default_encryption: Some(DefaultEncryption {
                    sse_algorithm: "AES256".to_string(),
                    kms_master_key_id: None,
                }),
                bucket_key_enabled: Some(false),
            }]
        })
        .await
    }

    async fn public_access_block(&self, bucket: &str) -> ProviderResult<PublicAccessBlock> {
        self.call(Operation::GetPublicAccessBlock, Some(bucket), || {
            PublicAccessBlock {
                block_public_acls: Some(true),
                block_public_policy: Some(true),
                ignore_public_acls: Some(true),
                restrict_public_buckets: Some(true),
            }
        })
        .await
    }

    async fn bucket_tagging(&self, bucket: &str) -> ProviderResult<BTreeMap<String, String>> {
        self.call(Operation::GetBucketTagging, Some(bucket), || {
            BTreeMap::from([
                ("owner".to_string(), format!("team-{bucket}")),
                ("env".to_string(), "prod".to_string()),
            ])
        })
        .await
    }
}
