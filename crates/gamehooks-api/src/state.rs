//! Application state.

use std::sync::Arc;

use gamehooks_registry::WebhookRegistry;

/// State shared across handlers.
pub struct AppState {
    pub registry: Arc<WebhookRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<WebhookRegistry>) -> Self {
        Self { registry }
    }
}
