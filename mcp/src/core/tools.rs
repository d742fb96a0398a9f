//! The inventory tools and their handlers.
//!
//! Each tool binds one fixed [`ResourceKind`] recipe, takes no arguments, and
//! returns its records as a single JSON text payload.

use std::sync::Arc;

use rmcp::model::{Content, Tool};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::config::DiagnosticsConfig;
use crate::{
    aggregate::{AggregationEngine, DiagnosticsPayload, EnrichmentWarning, ResourceKind},
    annotations::ToolAnnotations,
    error::{InventoryError, InventoryResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryTool {
    ListDynamoDbTables,
    GetDynamoDbTableMetadata,
    ListKmsKeys,
    ListS3Buckets,
}

impl InventoryTool {
    pub const ALL: [InventoryTool; 4] = [
        InventoryTool::ListDynamoDbTables,
        InventoryTool::GetDynamoDbTableMetadata,
        InventoryTool::ListKmsKeys,
        InventoryTool::ListS3Buckets,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InventoryTool::ListDynamoDbTables => "list-dynamodb-tables",
            InventoryTool::GetDynamoDbTableMetadata => "get-dynamodb-table-metadata",
            InventoryTool::ListKmsKeys => "list-kms-keys",
            InventoryTool::ListS3Buckets => "list-s3-buckets",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InventoryTool::ListDynamoDbTables => "List DynamoDB tables",
            InventoryTool::GetDynamoDbTableMetadata => "DynamoDB table metadata",
            InventoryTool::ListKmsKeys => "List KMS keys",
            InventoryTool::ListS3Buckets => "List S3 buckets",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InventoryTool::ListDynamoDbTables => "List all DynamoDB tables",
            InventoryTool::GetDynamoDbTableMetadata => {
                "Get metadata of DynamoDB tables like created date, size, and pricing model"
            }
            InventoryTool::ListKmsKeys => {
                "List all KMS keys along with metadata like created date, key description, and ID"
            }
            InventoryTool::ListS3Buckets => {
                "List all S3 buckets along with commonly used metadata like creation date, \
                 region, versioning status, etc."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            InventoryTool::ListDynamoDbTables | InventoryTool::GetDynamoDbTableMetadata => {
                ResourceKind::Table
            }
            InventoryTool::ListKmsKeys => ResourceKind::Key,
            InventoryTool::ListS3Buckets => ResourceKind::Bucket,
        }
    }

    /// Protocol descriptor: empty input schema, read-only hints.
    pub fn descriptor(&self) -> Tool {
        let mut input_schema = Map::new();
        input_schema.insert("type".to_string(), Value::String("object".to_string()));
        input_schema.insert("properties".to_string(), Value::Object(Map::new()));

        let mut tool = Tool::new(self.name(), self.description(), Arc::new(input_schema));
        tool.annotations = Some(ToolAnnotations::inventory_query().to_rmcp(Some(self.title())));
        tool
    }
}

/// Serialized result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// The records, as JSON text
    pub payload: String,
    /// `{"warnings": [...]}` when diagnostics are enabled
    pub diagnostics: Option<String>,
}

impl ToolOutput {
    pub fn into_contents(self) -> Vec<Content> {
        let mut contents = vec![Content::text(self.payload)];
        if let Some(diagnostics) = self.diagnostics {
            contents.push(Content::text(diagnostics));
        }
        contents
    }
}

/// Runs the aggregation recipe bound to each tool and serializes the result.
pub struct ToolHandler {
    engine: AggregationEngine,
    include_warnings: bool,
}

impl ToolHandler {
    pub fn new(engine: AggregationEngine, diagnostics: &DiagnosticsConfig) -> Self {
        Self {
            engine,
            include_warnings: diagnostics.include_warnings,
        }
    }

    /// Route an invocation by tool name.
    pub async fn dispatch(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> InventoryResult<ToolOutput> {
        let tool = InventoryTool::from_name(name)
            .ok_or_else(|| InventoryError::ToolNotFound(name.to_string()))?;
        self.handle(tool, cancel).await
    }

    pub async fn handle(
        &self,
        tool: InventoryTool,
        cancel: &CancellationToken,
    ) -> InventoryResult<ToolOutput> {
        match tool {
            InventoryTool::ListDynamoDbTables => {
                let names = self.engine.list_table_names(cancel).await?;
                Ok(ToolOutput {
                    payload: serde_json::to_string(&names)?,
                    diagnostics: self.diagnostics(&[])?,
                })
            }
            _ => {
                let aggregation = self.engine.aggregate(tool.resource_kind(), cancel).await?;
                Ok(ToolOutput {
                    payload: serde_json::to_string(&aggregation.records)?,
                    diagnostics: self.diagnostics(&aggregation.warnings)?,
                })
            }
        }
    }

    fn diagnostics(&self, warnings: &[EnrichmentWarning]) -> InventoryResult<Option<String>> {
        if !self.include_warnings {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&DiagnosticsPayload { warnings })?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in InventoryTool::ALL {
            assert_eq!(InventoryTool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(InventoryTool::from_name("list-ec2-instances"), None);
    }

    #[test]
    fn test_tool_names_are_unique() {
        let names: HashSet<_> = InventoryTool::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), InventoryTool::ALL.len());
    }

    #[test]
    fn test_resource_kind_binding() {
        assert_eq!(
            InventoryTool::ListDynamoDbTables.resource_kind(),
            ResourceKind::Table
        );
        assert_eq!(
            InventoryTool::GetDynamoDbTableMetadata.resource_kind(),
            ResourceKind::Table
        );
        assert_eq!(InventoryTool::ListKmsKeys.resource_kind(), ResourceKind::Key);
        assert_eq!(
            InventoryTool::ListS3Buckets.resource_kind(),
            ResourceKind::Bucket
        );
    }

    #[test]
    fn test_descriptor_is_read_only_without_parameters() {
        let tool = InventoryTool::ListS3Buckets.descriptor();
        assert_eq!(tool.name, "list-s3-buckets");
        assert_eq!(
            tool.input_schema.get("type"),
            Some(&Value::String("object".to_string()))
        );
        assert_eq!(
            tool.input_schema.get("properties"),
            Some(&Value::Object(Map::new()))
        );

        let annotations = tool.annotations.expect("annotations");
        assert_eq!(annotations.read_only_hint, Some(true));
        assert_eq!(annotations.destructive_hint, Some(false));
    }

    #[test]
    fn test_output_contents_include_diagnostics_last() {
        let output = ToolOutput {
            payload: "[]".to_string(),
            diagnostics: Some(r#"{"warnings":[]}"#.to_string()),
        };
        assert_eq!(output.into_contents().len(), 2);

        let output = ToolOutput {
            payload: "[]".to_string(),
            diagnostics: None,
        };
        assert_eq!(output.into_contents().len(), 1);
    }
}
