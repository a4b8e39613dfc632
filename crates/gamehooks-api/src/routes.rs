//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::events::fire_event;
use crate::handlers::{
    available_events, create_endpoint, delete_endpoint, get_endpoint, list_endpoints,
    update_endpoint,
};
use crate::state::AppState;

/// Liveness probe.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}

/// Build the router with management routes mounted under `prefix`.
///
/// An empty prefix or `/` mounts them at the root.
pub fn create_router(state: Arc<AppState>, prefix: &str) -> Router {
    let management_routes = Router::new()
        .route("/", get(list_endpoints).post(create_endpoint))
        .route("/available-events", get(available_events))
        .route(
            "/{id}",
            get(get_endpoint).post(update_endpoint).delete(delete_endpoint),
        )
        .with_state(state.clone());

    let event_routes = Router::new()
        .route("/events/{name}", post(fire_event))
        .with_state(state);

    let liveness_route = Router::new().route("/livez", get(liveness_probe));

    let prefix = prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(management_routes)
    } else {
        Router::new().nest(prefix, management_routes)
    };

    router
        .merge(event_routes)
        .merge(liveness_route)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
