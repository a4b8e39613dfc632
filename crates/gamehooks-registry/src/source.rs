//! In-process event source.
//!
//! Game systems hold an `mpsc::Sender<HostEvent>` and emit into it without
//! knowing about webhooks. The pump drains the channel and hands each event
//! to the registry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::WebhookRegistry;

/// A named event raised by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEvent {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

impl HostEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Forward every event received on `rx` to [`WebhookRegistry::handle_event`].
///
/// Deliveries are detached. The task finishes once all senders are dropped
/// and the channel is drained.
pub fn spawn_event_pump(
    registry: Arc<WebhookRegistry>,
    mut rx: mpsc::Receiver<HostEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Event pump started");
        let mut forwarded = 0u64;

        while let Some(event) = rx.recv().await {
            let batch = registry.handle_event(&event.name, &event.payload).await;
            debug!("Event '{}' fanned out to {} endpoint(s)", event.name, batch.len());
            drop(batch);
            forwarded += 1;
        }

        info!("Event pump stopped after {} event(s)", forwarded);
    })
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
