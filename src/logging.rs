//! Tracing subscriber setup

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::reload;

type Reload = Box<dyn Fn(EnvFilter) -> Result<(), reload::Error> + Send + Sync>;

/// Handle for swapping the filter once the configured level is known
pub struct LogHandle {
    reload: Reload,
    from_env: bool,
}

impl LogHandle {
    /// Replace the filter with `filter`, unless `RUST_LOG` chose it
    pub fn set_filter(&self, filter: &str) -> Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = parse_filter(filter)?;
        (self.reload)(filter).context("Failed to reload log filter")
    }
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter {:?}", filter))
}

/// Install a fmt subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already installed.
pub fn init(default_filter: &str) -> Result<LogHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (parse_filter(default_filter)?, false),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_filter_reloading();
    let handle = builder.reload_handle();
    builder
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(LogHandle {
        reload: Box::new(move |filter| handle.reload(filter)),
        from_env,
    })
}
