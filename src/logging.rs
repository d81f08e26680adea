//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset: progress from this crate, warnings elsewhere.
const DEFAULT_FILTER: &str = "warn,llm_summary_eval=info";

/// Install a global tracing subscriber writing to stderr.
///
/// Log lines go to stderr so the printed report on stdout stays clean.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(filter = DEFAULT_FILTER, "tracing initialised");
    Ok(())
}
