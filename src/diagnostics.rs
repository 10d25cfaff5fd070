//! Installation of a `tracing` subscriber for the logger's own diagnostics.
//!
//! The logger reports rotations, writer start/stop, and failures as `tracing`
//! events under the `solelog` target. Applications that already install a
//! subscriber get these for free; others can call [`init_diagnostics`].

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{Error, Level, Result};

/// `tracing` levels from least to most verbose.
const LADDER: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Install a stderr subscriber for `solelog` diagnostics.
///
/// Diagnostics follow the logger's own `min_priority`: a logger admitting
/// `INFO` also shows the crate's `info` events. Each `verbose` step lowers
/// that by one level, down to `trace`. A non-empty `RUST_LOG` replaces the
/// whole filter.
pub fn init_diagnostics(min_priority: Level, verbose: u8) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = env_filter(&filter_spec(rust_log.as_deref(), min_priority, verbose))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true)
        .boxed();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Init(e.to_string()))
}

fn env_filter(spec: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(spec).map_err(|e| Error::Init(format!("bad filter '{}': {}", spec, e)))
}

/// Position of a severity on [`LADDER`]; CRITICAL has no `tracing` level of its own.
fn ladder_index(level: Level) -> usize {
    match level {
        Level::Critical | Level::Error => 0,
        Level::Warning => 1,
        Level::Info => 2,
        Level::Debug => 3,
    }
}

fn filter_spec(rust_log: Option<&str>, min_priority: Level, verbose: u8) -> String {
    if let Some(env) = rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        return env.to_string();
    }
    let index = (ladder_index(min_priority) + usize::from(verbose)).min(LADDER.len() - 1);
    format!("warn,solelog={}", LADDER[index])
}
