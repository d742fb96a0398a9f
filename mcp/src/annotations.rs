//! Tool behavior hints advertised to clients.
//!
//! We keep [`ToolAnnotations`] separate from [`rmcp::model::ToolAnnotations`]
//! because rmcp's hints are all `Option<bool>`. Ours are plain `bool`s with
//! conservative defaults (destructive, not read-only) and are always sent in
//! full.

use rmcp::model::ToolAnnotations as RmcpToolAnnotations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
    pub open_world: bool,
}

impl Default for ToolAnnotations {
    fn default() -> Self {
        Self {
            read_only: false,
            destructive: true,
            idempotent: false,
            open_world: true,
        }
    }
}

impl ToolAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints for a side-effect-free inventory query against a live account.
    pub fn inventory_query() -> Self {
        Self::new()
            .with_read_only(true)
            .with_destructive(false)
            .with_idempotent(true)
    }

    #[must_use]
    pub fn with_read_only(mut self, v: bool) -> Self {
        self.read_only = v;
        self
    }

    #[must_use]
    pub fn with_destructive(mut self, v: bool) -> Self {
        self.destructive = v;
        self
    }

    #[must_use]
    pub fn with_idempotent(mut self, v: bool) -> Self {
        self.idempotent = v;
        self
    }

    pub fn to_rmcp(&self, title: Option<&str>) -> RmcpToolAnnotations {
        RmcpToolAnnotations {
            title: title.map(str::to_string),
            read_only_hint: Some(self.read_only),
            destructive_hint: Some(self.destructive),
            idempotent_hint: Some(self.idempotent),
            open_world_hint: Some(self.open_world),
        }
    }
}
