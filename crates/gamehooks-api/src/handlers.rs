//! Management route handlers.
//!
//! Paths are relative to the configured prefix:
//! - GET    /                  - List endpoints
//! - POST   /                  - Register endpoint
//! - GET    /available-events  - List catalog events
//! - GET    /{id}              - Get endpoint
//! - POST   /{id}              - Update endpoint
//! - DELETE /{id}              - Delete endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gamehooks_registry::{CreateEndpoint, Endpoint, UpdateEndpoint};

use crate::error::ApiError;
use crate::state::AppState;

/// Response for listing endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEndpointsResponse {
    pub endpoints: Vec<Endpoint>,
}

/// Response for deleting an endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEndpointResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Response for the event catalog.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableEventsResponse {
    pub available_events: Vec<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

/// List all endpoints.
///
/// GET /
pub async fn list_endpoints(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListEndpointsResponse>, ApiError> {
    let endpoints = state.registry.list().await?;
    Ok(Json(ListEndpointsResponse { endpoints }))
}

/// Register a new endpoint.
///
/// POST /
pub async fn create_endpoint(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateEndpoint>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_body(body)?;
    let endpoint = state.registry.create(request).await?;
    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// List the event names currently offered by the host.
///
/// GET /available-events
pub async fn available_events(State(state): State<Arc<AppState>>) -> Json<AvailableEventsResponse> {
    Json(AvailableEventsResponse {
        available_events: state.registry.list_available_events(),
    })
}

/// Get an endpoint by ID.
///
/// GET /{id}
pub async fn get_endpoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Endpoint>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.registry.get(id).await?))
}

/// Partially update an endpoint.
///
/// POST /{id}
pub async fn update_endpoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEndpoint>, JsonRejection>,
) -> Result<Json<Endpoint>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_body(body)?;
    Ok(Json(state.registry.update(id, changes).await?))
}

/// Delete an endpoint. Unknown ids report `deleted: false`.
///
/// DELETE /{id}
pub async fn delete_endpoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEndpointResponse>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.registry.delete(id).await?;
    Ok(Json(DeleteEndpointResponse { id, deleted }))
}
