//! Outbound webhook delivery.
//!
//! A [`Dispatcher`] performs one delivery of one payload to one endpoint and
//! reports the outcome. It never returns an error: failures are recorded in
//! the [`DeliveryOutcome`] and logged. Scheduling deliveries concurrently is
//! the registry's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use uuid::Uuid;

use gamehooks_config::DispatchConfig;

use crate::error::RegistryError;
use crate::types::Endpoint;

/// Result of delivering one event to one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The receiver answered with a 2xx status.
    Delivered { status: u16 },
    /// Every attempt failed; carries the last failure.
    Failed { reason: String },
}

/// Delivery report for a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub endpoint_id: Uuid,
    pub url: String,
    pub attempts: u32,
    pub result: DeliveryResult,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.result, DeliveryResult::Delivered { .. })
    }
}

/// Delivers serialized event payloads to endpoints.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver `payload` (serialized JSON) to `endpoint`.
    async fn deliver(&self, endpoint: &Endpoint, payload: &str) -> DeliveryOutcome;
}

/// HTTP dispatcher backed by `reqwest`.
///
/// Each attempt is a `POST` with `Content-Type: application/json`, bounded by
/// the configured request timeout. With `max_attempts = 1` (the default) an
/// event is delivered at most once per endpoint; larger values retry with a
/// linear backoff.
pub struct HttpDispatcher {
    client: Client,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl HttpDispatcher {
    /// Build a dispatcher from configuration.
    pub fn new(config: &DispatchConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RegistryError::Dispatcher(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn send_once(&self, url: &str, payload: &str) -> Result<u16, String> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request timed out: {}", e)
                } else {
                    format!("request failed: {}", e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(format!("HTTP {}: {}", status, body))
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn deliver(&self, endpoint: &Endpoint, payload: &str) -> DeliveryOutcome {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.send_once(&endpoint.url, payload).await {
                Ok(status) => {
                    info!(
                        "Webhook delivered to {} ({}) status={} attempt={}",
                        endpoint.id, endpoint.url, status, attempt
                    );
                    return DeliveryOutcome {
                        endpoint_id: endpoint.id,
                        url: endpoint.url.clone(),
                        attempts: attempt,
                        result: DeliveryResult::Delivered { status },
                    };
                }
                Err(e) => {
                    if attempt < self.max_attempts {
                        info!(
                            "Webhook attempt {} to {} failed: {}, retrying...",
                            attempt, endpoint.url, e
                        );
                        tokio::time::sleep(self.retry_backoff * attempt).await;
                    }
                    last_error = e;
                }
            }
        }

        warn!(
            "Webhook delivery to {} ({}) failed after {} attempt(s): {}",
            endpoint.id, endpoint.url, self.max_attempts, last_error
        );

        DeliveryOutcome {
            endpoint_id: endpoint.id,
            url: endpoint.url.clone(),
            attempts: self.max_attempts,
            result: DeliveryResult::Failed { reason: last_error },
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
