//! Read-only AWS resource inventory served over the Model Context Protocol.
//!
//! ## Modules
//!
//! - [`aggregate`]: list, enrich, and merge resource metadata
//! - [`provider`]: provider client facade and its AWS SDK implementation
//! - [`core`]: configuration, tool handlers, and the MCP server handler
//!
//! ## Shared Types
//!
//! - [`ToolAnnotations`]: Tool behavior hints (read_only, destructive, etc.)

// Shared types (used across modules)
pub mod annotations;
pub mod error;

// Subsystems
pub mod aggregate;
pub mod core;
pub mod provider;

pub use aggregate::{
    Aggregation, AggregationEngine, AggregationResult, BucketRecord, EnrichmentPolicy,
    EnrichmentWarning, Fragment, KeyRecord, ResourceKind, TableRecord,
};
pub use annotations::ToolAnnotations;
pub use self::core::{
    AwsConfig, DiagnosticsConfig, EnrichmentConfig, InventoryConfig, InventoryServer,
    InventoryTool, ToolHandler, ToolOutput,
};
pub use error::{EngineError, InventoryError, InventoryResult, Stage};
pub use provider::{
    AwsProvider, BucketProvider, CloudProvider, KeyProvider, Operation, ProviderError,
    ProviderResult, TableProvider,
};
