//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Management API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path prefix the management routes are mounted under.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "/hooks".to_string()
}

/// Endpoint document location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON document holding registered endpoints.
    /// A leading `~` is expanded to the home directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl StorageConfig {
    /// Path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.path))
    }
}

fn default_storage_path() -> String {
    dirs::home_dir()
        .map(|h| h.join(".gamehooks").join("webhooks.json"))
        .unwrap_or_else(|| PathBuf::from(".gamehooks/webhooks.json"))
        .to_string_lossy()
        .into_owned()
}

/// Outbound delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Delivery attempts per event per endpoint. 1 disables retries.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempts, multiplied by the attempt number.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Upper bound on deliveries in flight across all endpoints.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Deliveries to a single endpoint that may run at once.
    #[serde(default = "default_max_in_flight_per_endpoint")]
    pub max_in_flight_per_endpoint: usize,

    /// Deliveries to a single endpoint that may be pending, running or
    /// waiting. Further events for that endpoint are dropped.
    #[serde(default = "default_max_queued_per_endpoint")]
    pub max_queued_per_endpoint: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_in_flight: default_max_in_flight(),
            max_in_flight_per_endpoint: default_max_in_flight_per_endpoint(),
            max_queued_per_endpoint: default_max_queued_per_endpoint(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_max_in_flight() -> usize {
    64
}

fn default_max_in_flight_per_endpoint() -> usize {
    2
}

fn default_max_queued_per_endpoint() -> usize {
    256
}

fn default_user_agent() -> String {
    concat!("gamehooks/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Events the host announces as available for subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub events: Vec<String>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
