//! Inventory server handler.
//!
//! Implements RMCP's `ServerHandler` trait to:
//! - Advertise the four inventory tools
//! - Route `tools/call` requests to the [`ToolHandler`]
//! - Thread the request's cancellation token into the aggregation

use std::{sync::Arc, time::Instant};

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData, RoleServer, ServerHandler,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{
    config::InventoryConfig,
    tools::{InventoryTool, ToolHandler},
};
use crate::{
    aggregate::{AggregationEngine, EnrichmentPolicy},
    error::InventoryError,
    provider::CloudProvider,
};

pub const SERVER_NAME: &str = "AWS MCP server";

const INSTRUCTIONS: &str = "Read-only inventory of DynamoDB tables, KMS keys, and S3 buckets \
     in one AWS region. Tools take no arguments. Metadata fields a sub-request could not fetch \
     are omitted rather than reported as errors.";

#[derive(Clone)]
pub struct InventoryServer {
    tools: Arc<ToolHandler>,
    server_info: ServerInfo,
}

impl InventoryServer {
    pub fn new(tools: ToolHandler) -> Self {
        let mut server_info = ServerInfo::default();
        server_info.capabilities = ServerCapabilities::builder().enable_tools().build();
        server_info.server_info.name = SERVER_NAME.to_string();
        server_info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        server_info.instructions = Some(INSTRUCTIONS.to_string());

        Self {
            tools: Arc::new(tools),
            server_info,
        }
    }

    /// Wire a provider into an engine and handler using the given configuration.
    pub fn from_provider(provider: Arc<dyn CloudProvider>, config: &InventoryConfig) -> Self {
        let engine = AggregationEngine::new(provider, EnrichmentPolicy::from(&config.enrichment));
        Self::new(ToolHandler::new(engine, &config.diagnostics))
    }

    pub fn tool_descriptors() -> Vec<Tool> {
        InventoryTool::ALL.iter().map(InventoryTool::descriptor).collect()
    }

    /// Invoke a tool by name.
    ///
    /// Fatal aggregation failures come back as an error-flagged result carrying
    /// the cause; only an unknown tool name is a protocol error.
    pub async fn invoke(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<CallToolResult, ErrorData> {
        let started = Instant::now();
        debug!(tool = %name, "Tool invocation started");

        match self.tools.dispatch(name, cancel).await {
            Ok(output) => {
                info!(
                    tool = %name,
                    payload_bytes = output.payload.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool invocation succeeded"
                );
                Ok(CallToolResult::success(output.into_contents()))
            }
            Err(InventoryError::ToolNotFound(name)) => Err(ErrorData::invalid_params(
                format!("Tool not found: {name}"),
                None,
            )),
            Err(e) => {
                error!(
                    tool = %name,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool invocation failed"
                );
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

impl ServerHandler for InventoryServer {
    fn get_info(&self) -> ServerInfo {
        self.server_info.clone()
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(Self::tool_descriptors()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(&request.name, &context.ct).await
    }
}
