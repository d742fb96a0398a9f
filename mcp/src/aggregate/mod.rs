//! Resource metadata aggregation: list, enrich, merge.

pub mod diagnostics;
pub mod engine;
pub mod types;

pub use diagnostics::{Aggregation, DiagnosticsPayload, EnrichmentWarning};
pub use engine::{AggregationEngine, EnrichmentPolicy};
pub use types::{
    AggregationResult, BillingModeSummary, BucketRecord, BucketSummary, DefaultEncryption,
    EncryptionRule, Fragment, KeyMetadata, KeyRecord, PublicAccessBlock, ResourceKind,
    TableDescription, TableRecord,
};
