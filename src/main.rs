use std::sync::Arc;

use lekha::api::{api_router, ApiContext};
use lekha::config::AppConfig;
use lekha::pipeline::processor::build_processor;

#[tokio::main]
async fn main() {
    // Load .env before reading configuration; missing file is fine.
    let _ = dotenvy::dotenv();
    lekha::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let processor = match build_processor(&config) {
        Ok(processor) => processor,
        Err(err) => {
            tracing::error!(error = %err, "failed to build document processor");
            std::process::exit(1);
        }
    };

    if let Err(err) = std::fs::create_dir_all(&config.upload_dir) {
        tracing::error!(
            dir = %config.upload_dir.display(),
            error = %err,
            "cannot create upload directory"
        );
        std::process::exit(1);
    }

    let bind_addr = config.bind_addr.clone();
    let ctx = ApiContext::new(Arc::new(config), Arc::new(processor));
    let app = api_router(ctx);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(bind_addr, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(bind_addr, version = env!("CARGO_PKG_VERSION"), "listening");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }
}
