//! Aggregation engine.
//!
//! Runs one list call, fans out the describe sub-calls for every listed
//! resource, and merges whatever succeeded into one record per resource.
//!
//! ## Failure policy
//!
//! - A failed list call is fatal: [`EngineError::Stage`] with no records.
//! - A failed (or timed out) sub-call only drops its own fragment. It is
//!   logged and reported as an [`EnrichmentWarning`], never as an error.
//!
//! ## Scheduling
//!
//! Resources are enriched through an order-preserving bounded stream, so the
//! output keeps list order no matter which sub-call finishes first. The
//! sub-calls of one bucket run concurrently and are joined before its record
//! is built.

use std::{
    collections::BTreeMap,
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    diagnostics::{Aggregation, EnrichmentWarning},
    types::{
        AggregationResult, BucketRecord, BucketSummary, Fragment, KeyRecord, ResourceKind,
        TableRecord,
    },
};
use crate::{
    core::config::EnrichmentConfig,
    error::EngineError,
    provider::{CloudProvider, ProviderError, ProviderResult},
};

/// Bounds applied to the enrichment fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentPolicy {
    /// Resources enriched at the same time.
    pub max_concurrency: usize,
    /// Sub-calls still pending after this long count as failed.
    pub sub_call_timeout: Option<Duration>,
}

impl Default for EnrichmentPolicy {
    fn default() -> Self {
        Self {
            max_concurrency: EnrichmentConfig::default_max_concurrency(),
            sub_call_timeout: None,
        }
    }
}

impl From<&EnrichmentConfig> for EnrichmentPolicy {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            sub_call_timeout: config.sub_call_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Move a sub-call outcome into its record slot, or into the warning list.
fn settle<T>(
    outcome: Result<T, EnrichmentWarning>,
    warnings: &mut Vec<EnrichmentWarning>,
) -> Option<T> {
    match outcome {
        Ok(fragment) => Some(fragment),
        Err(warning) => {
            warnings.push(warning);
            None
        }
    }
}

pub struct AggregationEngine {
    provider: Arc<dyn CloudProvider>,
    policy: EnrichmentPolicy,
}

impl AggregationEngine {
    pub fn new(provider: Arc<dyn CloudProvider>, policy: EnrichmentPolicy) -> Self {
        Self { provider, policy }
    }

    /// Aggregate every resource of `kind`.
    pub async fn aggregate(
        &self,
        kind: ResourceKind,
        cancel: &CancellationToken,
    ) -> Result<Aggregation<AggregationResult>, EngineError> {
        let started = Instant::now();

        let work = async {
            match kind {
                ResourceKind::Table => self
                    .aggregate_tables()
                    .await
                    .map(|a| a.map(AggregationResult::Tables)),
                ResourceKind::Key => self
                    .aggregate_keys()
                    .await
                    .map(|a| a.map(AggregationResult::Keys)),
                ResourceKind::Bucket => self
                    .aggregate_buckets()
                    .await
                    .map(|a| a.map(AggregationResult::Buckets)),
            }
        };

        let aggregation = self.cancellable(work, cancel).await?;
        info!(
            kind = %kind,
            records = aggregation.records.len(),
            warnings = aggregation.warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation complete"
        );
        Ok(aggregation)
    }

    /// Table names only, with no enrichment.
    pub async fn list_table_names(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EngineError> {
        self.cancellable(
            async { self.provider.list_tables().await.map_err(EngineError::list) },
            cancel,
        )
        .await
    }

    async fn cancellable<T>(
        &self,
        work: impl Future<Output = Result<T, EngineError>>,
        cancel: &CancellationToken,
    ) -> Result<T, EngineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Aggregation cancelled by caller");
                Err(EngineError::Cancelled)
            }
            result = work => result,
        }
    }

    // ========================================================================
    // Per-kind recipes
    // ========================================================================

    async fn aggregate_tables(
        &self,
    ) -> Result<Aggregation<BTreeMap<String, TableRecord>>, EngineError> {
        let names = self
            .provider
            .list_tables()
            .await
            .map_err(EngineError::list)?;
        debug!(
            operation = %ResourceKind::Table.list_operation(),
            tables = names.len(),
            "Listed tables"
        );

        let enriched = self
            .fan_out(names, |name| async move {
                let description = self
                    .resolve(&name, Fragment::Table, self.provider.describe_table(&name))
                    .await;
                (name, description)
            })
            .await;

        let mut warnings = Vec::new();
        let records = enriched
            .into_iter()
            .map(|(name, description)| {
                let record = TableRecord {
                    description: settle(description, &mut warnings),
                };
                (name, record)
            })
            .collect();

        Ok(Aggregation::new(records, warnings))
    }

    async fn aggregate_keys(&self) -> Result<Aggregation<Vec<KeyRecord>>, EngineError> {
        let key_ids = self.provider.list_keys().await.map_err(EngineError::list)?;
        debug!(
            operation = %ResourceKind::Key.list_operation(),
            keys = key_ids.len(),
            "Listed keys"
        );

        let enriched = self
            .fan_out(key_ids, |key_id| async move {
                let metadata = self
                    .resolve(
                        &key_id,
                        Fragment::KeyMetadata,
                        self.provider.describe_key(&key_id),
                    )
                    .await;
                (key_id, metadata)
            })
            .await;

        let mut warnings = Vec::new();
        let records = enriched
            .into_iter()
            .map(|(key_id, metadata)| KeyRecord {
                key_id,
                metadata: settle(metadata, &mut warnings),
            })
            .collect();

        Ok(Aggregation::new(records, warnings))
    }

    async fn aggregate_buckets(&self) -> Result<Aggregation<Vec<BucketRecord>>, EngineError> {
        let buckets = self
            .provider
            .list_buckets()
            .await
            .map_err(EngineError::list)?;
        debug!(
            operation = %ResourceKind::Bucket.list_operation(),
            buckets = buckets.len(),
            "Listed buckets"
        );

        let enriched = self
            .fan_out(buckets, |bucket| self.enrich_bucket(bucket))
            .await;

        let mut warnings = Vec::new();
        let records = enriched
            .into_iter()
            .map(|(record, mut bucket_warnings)| {
                warnings.append(&mut bucket_warnings);
                record
            })
            .collect();

        Ok(Aggregation::new(records, warnings))
    }

    async fn enrich_bucket(&self, summary: BucketSummary) -> (BucketRecord, Vec<EnrichmentWarning>) {
        let name = summary.name.as_str();
        let provider = &self.provider;

        let (region, versioning, encryption, public_access_block, tags) = tokio::join!(
            self.resolve(name, Fragment::Region, provider.bucket_location(name)),
            self.resolve(name, Fragment::Versioning, provider.bucket_versioning(name)),
            self.resolve(name, Fragment::Encryption, provider.bucket_encryption(name)),
            self.resolve(
                name,
                Fragment::PublicAccessBlock,
                provider.public_access_block(name)
            ),
            self.resolve(name, Fragment::Tags, provider.bucket_tagging(name)),
        );

        let mut warnings = Vec::new();
        let mut record = BucketRecord::listed(summary);
        record.region = settle(region, &mut warnings);
        record.versioning = settle(versioning, &mut warnings);
        record.encryption = settle(encryption, &mut warnings);
        record.public_access_block = settle(public_access_block, &mut warnings);
        record.tags = settle(tags, &mut warnings);

        (record, warnings)
    }

    // ========================================================================
    // Fan-out helpers
    // ========================================================================

    async fn fan_out<I, R, F, Fut>(&self, items: Vec<I>, enrich: F) -> Vec<R>
    where
        F: FnMut(I) -> Fut,
        Fut: Future<Output = R>,
    {
        stream::iter(items)
            .map(enrich)
            .buffered(self.policy.max_concurrency.max(1))
            .collect()
            .await
    }

    /// Await one sub-call, translating failure and timeout into a warning.
    async fn resolve<T>(
        &self,
        resource: &str,
        fragment: Fragment,
        call: impl Future<Output = ProviderResult<T>>,
    ) -> Result<T, EnrichmentWarning> {
        let outcome = match self.policy.sub_call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::timed_out(
                        fragment.operation(),
                        resource,
                        limit,
                    ))
                }),
            None => call.await,
        };

        outcome.map_err(|error| {
            warn!(
                resource = %resource,
                fragment = %fragment,
                operation = %error.operation,
                error = %error.message,
                "Enrichment sub-call failed, omitting fragment"
            );
            EnrichmentWarning::new(resource, fragment, &error)
        })
    }
}
