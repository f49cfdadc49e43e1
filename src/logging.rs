// src/logging.rs
// =============================================================================
// Sets up `tracing` so diagnostics go to stderr.
//
// stdout is reserved for results (tables or JSON), so piping
// `patch-finder scan ... --json | jq` keeps working while progress and
// warnings still show up in the terminal.
//
// Filtering:
// - RUST_LOG wins when set (e.g. RUST_LOG=patch_finder=trace)
// - otherwise "patch_finder=info", or "patch_finder=debug" with --verbose
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "patch_finder=debug"
    } else {
        "patch_finder=info"
    }
}

pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("tracing setup failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "patch_finder=info");
        assert_eq!(default_filter(true), "patch_finder=debug");
    }
}
