//! Server infrastructure: configuration, tool handlers, and the MCP server.

pub mod config;
pub mod server;
pub mod tools;

pub use config::{
    AwsConfig, ConfigValidationError, DiagnosticsConfig, EnrichmentConfig, InventoryConfig,
};
pub use server::{InventoryServer, SERVER_NAME};
pub use tools::{InventoryTool, ToolHandler, ToolOutput};
