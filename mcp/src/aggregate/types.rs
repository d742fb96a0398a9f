//! Resource kinds, metadata fragments, and aggregated records.
//!
//! Every fragment a describe sub-call produces is a named optional field on
//! its record. `None` means the sub-call failed; a present fragment is always
//! the complete output of one successful call. Field names serialize in the
//! provider's PascalCase so payloads match the provider's own vocabulary.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::provider::Operation;

/// Kind of cloud resource an aggregation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Table,
    Key,
    Bucket,
}

impl ResourceKind {
    /// The operation that produces this kind's identifier set.
    pub fn list_operation(&self) -> Operation {
        match self {
            ResourceKind::Table => Operation::ListTables,
            ResourceKind::Key => Operation::ListKeys,
            ResourceKind::Bucket => Operation::ListBuckets,
        }
    }

    /// Fragments fetched for each listed resource of this kind.
    pub fn fragments(&self) -> &'static [Fragment] {
        match self {
            ResourceKind::Table => &[Fragment::Table],
            ResourceKind::Key => &[Fragment::KeyMetadata],
            ResourceKind::Bucket => &[
                Fragment::Region,
                Fragment::Versioning,
                Fragment::Encryption,
                Fragment::PublicAccessBlock,
                Fragment::Tags,
            ],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Table => "table",
            ResourceKind::Key => "key",
            ResourceKind::Bucket => "bucket",
        })
    }
}

/// Field group filled by exactly one describe sub-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fragment {
    Table,
    KeyMetadata,
    Region,
    Versioning,
    Encryption,
    PublicAccessBlock,
    Tags,
}

impl Fragment {
    pub fn operation(&self) -> Operation {
        match self {
            Fragment::Table => Operation::DescribeTable,
            Fragment::KeyMetadata => Operation::DescribeKey,
            Fragment::Region => Operation::GetBucketLocation,
            Fragment::Versioning => Operation::GetBucketVersioning,
            Fragment::Encryption => Operation::GetBucketEncryption,
            Fragment::PublicAccessBlock => Operation::GetPublicAccessBlock,
            Fragment::Tags => Operation::GetBucketTagging,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fragment::Table => "Table",
            Fragment::KeyMetadata => "KeyMetadata",
            Fragment::Region => "Region",
            Fragment::Versioning => "Versioning",
            Fragment::Encryption => "Encryption",
            Fragment::PublicAccessBlock => "PublicAccessBlock",
            Fragment::Tags => "Tags",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Core attributes from a single `DescribeTable` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    pub created_date: Option<DateTime<Utc>>,
    pub size_bytes: Option<i64>,
    pub pricing_model: Option<BillingModeSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingModeSummary {
    pub billing_mode: Option<String>,
    pub last_update_to_pay_per_request_date_time: Option<DateTime<Utc>>,
}

/// One table's record; an empty object when its describe call failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableRecord {
    #[serde(flatten)]
    pub description: Option<TableDescription>,
}

// ============================================================================
// Keys
// ============================================================================

/// Attributes from a single `DescribeKey` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyMetadata {
    pub arn: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub enabled: bool,
    pub key_state: Option<String>,
    pub key_manager: Option<String>,
    pub key_usage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyRecord {
    #[serde(rename = "KeyId")]
    pub key_id: String,
    #[serde(flatten)]
    pub metadata: Option<KeyMetadata>,
}

// ============================================================================
// Buckets
// ============================================================================

/// A bucket as returned by the list step.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

impl BucketSummary {
    pub fn new(name: impl Into<String>, creation_date: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            creation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptionRule {
    #[serde(rename = "ApplyServerSideEncryptionByDefault")]
    pub default_encryption: Option<DefaultEncryption>,
    #[serde(rename = "BucketKeyEnabled")]
    pub bucket_key_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultEncryption {
    #[serde(rename = "SSEAlgorithm")]
    pub sse_algorithm: String,
    #[serde(rename = "KMSMasterKeyID")]
    pub kms_master_key_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlock {
    pub block_public_acls: Option<bool>,
    pub block_public_policy: Option<bool>,
    pub ignore_public_acls: Option<bool>,
    pub restrict_public_buckets: Option<bool>,
}

/// One bucket's record. `Name` and `CreationDate` come from the list step;
/// every other field is present only when its sub-call succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketRecord {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<Vec<EncryptionRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_block: Option<PublicAccessBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl BucketRecord {
    /// Record with only the list-step fields populated.
    pub fn listed(summary: BucketSummary) -> Self {
        Self {
            name: summary.name,
            creation_date: summary.creation_date,
            region: None,
            versioning: None,
            encryption: None,
            public_access_block: None,
            tags: None,
        }
    }

    /// Whether the given fragment made it into this record.
    pub fn has(&self, fragment: Fragment) -> bool {
        match fragment {
            Fragment::Region => self.region.is_some(),
            Fragment::Versioning => self.versioning.is_some(),
            Fragment::Encryption => self.encryption.is_some(),
            Fragment::PublicAccessBlock => self.public_access_block.is_some(),
            Fragment::Tags => self.tags.is_some(),
            Fragment::Table | Fragment::KeyMetadata => false,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Output of one aggregation, shaped per resource kind.
///
/// Tables are keyed by name in an ordered map; keys and buckets keep the
/// order of the list step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregationResult {
    Tables(BTreeMap<String, TableRecord>),
    Keys(Vec<KeyRecord>),
    Buckets(Vec<BucketRecord>),
}

impl AggregationResult {
    pub fn kind(&self) -> ResourceKind {
        match self {
            AggregationResult::Tables(_) => ResourceKind::Table,
            AggregationResult::Keys(_) => ResourceKind::Key,
            AggregationResult::Buckets(_) => ResourceKind::Bucket,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AggregationResult::Tables(records) => records.len(),
            AggregationResult::Keys(records) => records.len(),
            AggregationResult::Buckets(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
