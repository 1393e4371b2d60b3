//! Bearer token authentication middleware.
//!
//! Accesses `ApiContext` from request extensions (injected by the
//! Extension layer). When no API token is configured, protected routes
//! are open; this matches single-user local deployments.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require `Authorization: Bearer <token>` matching the configured
/// API token, when one is set.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    if let Some(expected) = ctx.config.api_token.as_deref() {
        let presented = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        if presented != expected {
            tracing::warn!("rejected request with invalid bearer token");
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(req).await)
}
