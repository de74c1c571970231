//! Tracing initialization.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`).
///
/// ```bash
/// RUST_LOG=stepwise_workflow=debug stepwise plan workflow.json
/// ```
pub fn init_tracing() -> anyhow::Result<()> {
  let env_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new("warn"))
    .map_err(|e| anyhow::anyhow!("failed to create env filter: {e}"))?;

  // stdout carries the JSON results
  let fmt_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(true)
    .with_level(true);

  tracing_subscriber::registry()
    .with(fmt_layer)
    .with(env_filter)
    .try_init()
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

  Ok(())
}
