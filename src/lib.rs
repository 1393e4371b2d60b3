pub mod api;
pub mod config;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with `RUST_LOG` override support.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
