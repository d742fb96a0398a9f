//! Advisory diagnostics for best-effort enrichment.

use serde::Serialize;

use super::types::Fragment;
use crate::provider::{Operation, ProviderError};

/// A fragment left out of a record because its sub-call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentWarning {
    pub resource: String,
    pub fragment: Fragment,
    pub operation: Operation,
    pub reason: String,
}

impl EnrichmentWarning {
    pub fn new(resource: impl Into<String>, fragment: Fragment, error: &ProviderError) -> Self {
        Self {
            resource: resource.into(),
            fragment,
            operation: error.operation,
            reason: error.message.clone(),
        }
    }
}

/// Records of one aggregation plus the warnings collected while enriching them.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<T> {
    pub records: T,
    pub warnings: Vec<EnrichmentWarning>,
}

impl<T> Aggregation<T> {
    pub fn new(records: T, warnings: Vec<EnrichmentWarning>) -> Self {
        Self { records, warnings }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregation<U> {
        Aggregation {
            records: f(self.records),
            warnings: self.warnings,
        }
    }
}

/// Serialized form of the diagnostics channel.
#[derive(Debug, Serialize)]
pub struct DiagnosticsPayload<'a> {
    pub warnings: &'a [EnrichmentWarning],
}
