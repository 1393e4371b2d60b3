//! Shared state for the HTTP API layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::pipeline::processor::DocumentProcessor;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub processor: Arc<DocumentProcessor>,
}

impl ApiContext {
    pub fn new(config: Arc<AppConfig>, processor: Arc<DocumentProcessor>) -> Self {
        Self { config, processor }
    }
}
