//! Inventory error types.
//!
//! Defines the provider, engine, and crate-level error variants. Only
//! [`EngineError`] and serialization failures are fatal for a tool
//! invocation; enrichment failures never surface here.

use std::fmt;

use thiserror::Error;

use crate::provider::ProviderError;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Aggregation stage that produced a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    List,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::List => "list",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal aggregation errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The stage has nothing to aggregate without its result.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    /// The caller cancelled the invocation before it completed.
    #[error("Aggregation cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn list(source: ProviderError) -> Self {
        EngineError::Stage {
            stage: Stage::List,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Operation;

    #[test]
    fn test_list_stage_message_carries_cause() {
        let err = EngineError::list(ProviderError::new(
            Operation::ListBuckets,
            None,
            "AccessDenied",
        ));
        assert!(matches!(
            err,
            EngineError::Stage {
                stage: Stage::List,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "list stage failed: ListBuckets failed: AccessDenied"
        );
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err: InventoryError = EngineError::Cancelled.into();
        assert_eq!(err.to_string(), "Aggregation cancelled");
    }
}
