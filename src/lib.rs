pub mod api; // HTTP classification service
pub mod config;
pub mod core_state; // Shared tables + swappable ML classifier
pub mod models;
pub mod pipeline;

mod pii_audit;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
