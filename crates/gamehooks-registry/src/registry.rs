//! Webhook registry facade.
//!
//! The single entry point for management requests and host events. Owns no
//! global state: the store, catalog and dispatcher are injected at
//! construction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::EventCatalog;
use crate::dispatcher::{DeliveryOutcome, Dispatcher};
use crate::error::RegistryError;
use crate::pattern::PatternMatcher;
use crate::secret::generate_secret;
use crate::store::EndpointStore;
use crate::types::{CreateEndpoint, Endpoint, UpdateEndpoint};

/// Default bound on concurrent deliveries.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Default bound on concurrent deliveries to one endpoint.
pub const DEFAULT_MAX_IN_FLIGHT_PER_ENDPOINT: usize = 2;

/// Default bound on deliveries pending for one endpoint.
pub const DEFAULT_MAX_QUEUED_PER_ENDPOINT: usize = 256;

/// Delivery slots of a single endpoint.
struct EndpointLane {
    permits: Arc<Semaphore>,
    queued: AtomicUsize,
}

/// Held by a delivery task from scheduling until it finishes.
struct QueueSlot(Arc<EndpointLane>);

impl Drop for QueueSlot {
    fn drop(&mut self) {
        self.0.queued.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Deliveries scheduled for one fired event.
///
/// Dropping the batch detaches the deliveries; they keep running. Call
/// [`join`](Self::join) to wait for their outcomes.
#[must_use = "drop the batch to fire and forget, or join it to collect outcomes"]
pub struct DispatchBatch {
    event: String,
    handles: Vec<JoinHandle<DeliveryOutcome>>,
}

impl DispatchBatch {
    fn empty(event: &str) -> Self {
        Self {
            event: event.to_string(),
            handles: Vec::new(),
        }
    }

    /// Name of the fired event.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Number of deliveries scheduled.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every delivery to finish.
    pub async fn join(self) -> Vec<DeliveryOutcome> {
        join_all(self.handles)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    error!("Delivery task for '{}' aborted: {}", self.event, e);
                    None
                }
            })
            .collect()
    }
}

/// Registry facade composing store, pattern validation, secret generation
/// and dispatch.
///
/// A delivery first takes a slot on its endpoint's lane, then a global
/// permit. An endpoint can hold at most `max_in_flight - 1` global permits,
/// so a stalled receiver never starves the others. Events arriving for an
/// endpoint that already has `max_queued_per_endpoint` pending deliveries
/// are dropped.
pub struct WebhookRegistry {
    store: Arc<EndpointStore>,
    catalog: Arc<dyn EventCatalog>,
    dispatcher: Arc<dyn Dispatcher>,
    matcher: PatternMatcher,
    in_flight: Arc<Semaphore>,
    max_in_flight: usize,
    max_in_flight_per_endpoint: usize,
    max_queued_per_endpoint: usize,
    lanes: DashMap<Uuid, Arc<EndpointLane>>,
}

impl WebhookRegistry {
    /// Create a registry with the default in-flight delivery bound.
    pub fn new(
        store: Arc<EndpointStore>,
        catalog: Arc<dyn EventCatalog>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            store,
            catalog,
            dispatcher,
            matcher: PatternMatcher::new(),
            in_flight: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT)),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_in_flight_per_endpoint: DEFAULT_MAX_IN_FLIGHT_PER_ENDPOINT,
            max_queued_per_endpoint: DEFAULT_MAX_QUEUED_PER_ENDPOINT,
            lanes: DashMap::new(),
        }
    }

    /// Set the maximum number of deliveries running at once.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self.in_flight = Arc::new(Semaphore::new(self.max_in_flight));
        self
    }

    /// Set the maximum number of deliveries to one endpoint running at once.
    pub fn with_max_in_flight_per_endpoint(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight_per_endpoint = max_in_flight.max(1);
        self
    }

    /// Set the maximum number of deliveries pending for one endpoint.
    pub fn with_max_queued_per_endpoint(mut self, max_queued: usize) -> Self {
        self.max_queued_per_endpoint = max_queued.max(1);
        self
    }

    /// Concurrent deliveries allowed per endpoint after capping below the
    /// global limit.
    fn lane_capacity(&self) -> usize {
        let cap = if self.max_in_flight > 1 {
            self.max_in_flight - 1
        } else {
            1
        };
        self.max_in_flight_per_endpoint.min(cap)
    }

    fn lane(&self, id: Uuid) -> Arc<EndpointLane> {
        self.lanes
            .entry(id)
            .or_insert_with(|| {
                Arc::new(EndpointLane {
                    permits: Arc::new(Semaphore::new(self.lane_capacity())),
                    queued: AtomicUsize::new(0),
                })
            })
            .clone()
    }

    /// Reserve a pending slot on the endpoint's lane, or `None` if it is full.
    fn reserve(&self, id: Uuid) -> Option<QueueSlot> {
        let lane = self.lane(id);
        let queued = lane.queued.fetch_add(1, Ordering::AcqRel);
        let slot = QueueSlot(lane);
        if queued >= self.max_queued_per_endpoint {
            return None;
        }
        Some(slot)
    }

    /// Deliveries currently pending for an endpoint.
    pub fn pending_deliveries(&self, id: Uuid) -> usize {
        self.lanes
            .get(&id)
            .map(|lane| lane.queued.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<EndpointStore> {
        &self.store
    }

    /// Register a new endpoint.
    ///
    /// `enabled_events` must match the current catalog; on rejection nothing
    /// is stored.
    pub async fn create(&self, request: CreateEndpoint) -> Result<Endpoint, RegistryError> {
        self.validate_events(&request.enabled_events)?;

        let endpoint = self
            .store
            .create(
                request.url,
                request.description,
                request.enabled_events,
                generate_secret(),
            )
            .await?;

        info!("Registered webhook endpoint {} -> {}", endpoint.id, endpoint.url);
        Ok(endpoint)
    }

    /// Fetch an endpoint.
    pub async fn get(&self, id: Uuid) -> Result<Endpoint, RegistryError> {
        self.store.get(id).await?.ok_or(RegistryError::NotFound(id))
    }

    /// Partially update an endpoint.
    ///
    /// `enabled_events` is re-validated only when supplied.
    pub async fn update(&self, id: Uuid, changes: UpdateEndpoint) -> Result<Endpoint, RegistryError> {
        if let Some(ref enabled_events) = changes.enabled_events {
            self.validate_events(enabled_events)?;
        }

        let endpoint = self
            .store
            .update(id, changes)
            .await?
            .ok_or(RegistryError::NotFound(id))?;

        info!("Updated webhook endpoint {} (status: {:?})", id, endpoint.status);
        Ok(endpoint)
    }

    /// Delete an endpoint. Unknown ids report `false`.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RegistryError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            self.lanes.remove(&id);
            info!("Deleted webhook endpoint {}", id);
        }
        Ok(deleted)
    }

    /// All endpoints in insertion order.
    pub async fn list(&self) -> Result<Vec<Endpoint>, RegistryError> {
        self.store.list().await
    }

    /// Event names currently offered by the host.
    pub fn list_available_events(&self) -> Vec<String> {
        self.catalog.list_events()
    }

    fn validate_events(&self, enabled_events: &[String]) -> Result<(), RegistryError> {
        let catalog = self.catalog.list_events();
        self.matcher.validate(enabled_events, &catalog)
    }

    /// Enabled endpoints with at least one pattern matching `event`.
    pub async fn subscribers(&self, event: &str) -> Result<Vec<Endpoint>, RegistryError> {
        let endpoints = self.store.list().await?;
        Ok(endpoints
            .into_iter()
            .filter(|e| e.status.is_enabled() && self.matcher.matches_any(&e.enabled_events, event))
            .collect())
    }

    /// React to a host event.
    ///
    /// Serializes `payload` once and schedules one delivery task per
    /// subscriber. Returns as soon as the tasks are spawned; never fails.
    pub async fn handle_event(&self, event: &str, payload: &Value) -> DispatchBatch {
        match serde_json::to_string(payload) {
            Ok(body) => self.handle_serialized_event(event, body).await,
            Err(e) => {
                error!("Failed to serialize payload for '{}': {}", event, e);
                DispatchBatch::empty(event)
            }
        }
    }

    /// Like [`handle_event`](Self::handle_event) for a payload that is
    /// already serialized JSON.
    pub async fn handle_serialized_event(
        &self,
        event: &str,
        payload: impl Into<Arc<str>>,
    ) -> DispatchBatch {
        let subscribers = match self.subscribers(event).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!("Failed to load endpoints for '{}': {}", event, e);
                return DispatchBatch::empty(event);
            }
        };

        if subscribers.is_empty() {
            debug!("No subscribers for '{}'", event);
            return DispatchBatch::empty(event);
        }

        let payload: Arc<str> = payload.into();
        let mut handles = Vec::with_capacity(subscribers.len());
        for endpoint in subscribers {
            let Some(slot) = self.reserve(endpoint.id) else {
                warn!(
                    "Dropping '{}' for endpoint {}: {} deliveries already pending",
                    event, endpoint.id, self.max_queued_per_endpoint
                );
                continue;
            };

            let dispatcher = self.dispatcher.clone();
            let in_flight = self.in_flight.clone();
            let payload = payload.clone();
            handles.push(tokio::spawn(async move {
                // Neither semaphore is ever closed.
                let _lane_permit = slot.0.permits.clone().acquire_owned().await.ok();
                let _permit = in_flight.acquire_owned().await.ok();
                let outcome = dispatcher.deliver(&endpoint, &payload).await;
                drop(slot);
                outcome
            }));
        }

        debug!("Dispatching '{}' to {} endpoint(s)", event, handles.len());
        DispatchBatch {
            event: event.to_string(),
            handles,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
