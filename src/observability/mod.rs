//! # Observability
//!
//! Structured logging for the harness. The stub server's request log and the
//! supervisor's lifecycle events share one `tracing` subscriber writing to
//! stdout, so both interleave with the orchestrator's phase output by
//! emission time. Stdout is line-buffered, which gives the per-line flush the
//! interleaving depends on.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Timestamp prefix format for every log line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops (integration tests may have installed one already).
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", default_level);
    }

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
            .finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
