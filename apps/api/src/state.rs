use std::sync::Arc;

use crate::config::Config;
use crate::provider::Provider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable for the lifetime of the server; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model provider. Production wires `LlmClient`; tests swap in a mock.
    pub provider: Arc<dyn Provider>,
    pub config: Config,
}
