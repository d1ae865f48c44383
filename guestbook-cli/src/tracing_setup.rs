//! Tracing setup for the guestbook CLI
//!
//! Usage:
//!   guestbook --debug ...                  # Debug logging to stderr
//!   RUST_LOG=guestbook_core=debug guestbook  # Fine-grained log control
//!
//! Logs always go to stderr so `list --json` stays pipeable. The `watch`
//! TUI owns the terminal, so it only logs when `--debug` is given.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Running the full-screen TUI
    pub tui: bool,
}

/// Initialize tracing with console output
pub fn init(config: &TracingConfig) -> Result<()> {
    if config.tui && !config.debug {
        return Ok(());
    }

    let filter = if config.debug {
        // Debug mode: set debug level unless RUST_LOG is explicitly set
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
