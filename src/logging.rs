//! Tracing subscriber setup.
//!
//! stdout carries the MCP stream, so logs always go to stderr.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).try_init()
    }
    .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
