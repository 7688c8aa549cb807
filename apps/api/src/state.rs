use std::sync::Arc;

use crate::classification::pipeline::Pipeline;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only across requests.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
