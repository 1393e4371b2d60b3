//! HTTP API router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. Routes are nested under `/api/`.
//!
//! `/api/health` is open; `/api/upload` sits behind the bearer-token
//! middleware. Middleware uses `Extension<ApiContext>` (injected as the
//! outermost layer); handlers use `State<ApiContext>`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    // Allow multipart framing overhead on top of the raw file limit;
    // the handler enforces the exact file-size cap.
    let body_limit = usize::try_from(ctx.config.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);

    let protected = Router::new()
        .route("/upload", post(endpoints::documents::upload))
        .with_state(ctx.clone())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::require_auth))
        .layer(axum::Extension(ctx.clone()));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", protected)
        .nest("/api", open)
        .layer(CorsLayer::permissive())
}
