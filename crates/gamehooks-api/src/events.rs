//! Event ingest.
//!
//! Lets a host that runs out of process fire events over HTTP.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for an accepted event.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAccepted {
    pub accepted: bool,
    pub event_name: String,
    /// Number of deliveries scheduled.
    pub dispatched: usize,
}

/// Fire a host event.
///
/// POST /events/{name}
///
/// The body is the event payload; an empty body is `null`. Returns once
/// deliveries are scheduled.
pub async fn fire_event(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<EventAccepted>), ApiError> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?
    };

    let batch = state.registry.handle_event(&name, &payload).await;
    let dispatched = batch.len();
    drop(batch);

    debug!("Accepted event '{}' ({} deliveries)", name, dispatched);
    Ok((
        StatusCode::ACCEPTED,
        Json(EventAccepted {
            accepted: true,
            event_name: name,
            dispatched,
        }),
    ))
}
