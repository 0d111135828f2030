//! Tracing subscriber setup for the server binary

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "download_events=info,tower_http=info";

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
