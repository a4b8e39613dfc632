//! Endpoint type definitions.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Delivery status of an endpoint.
///
/// Serialized as the literal variant name. Unrecognized or missing values
/// read back as [`EndpointStatus::Unknown`] instead of failing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EndpointStatus {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl EndpointStatus {
    /// Only enabled endpoints receive deliveries.
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

impl<'de> Deserialize<'de> for EndpointStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("Enabled") => Self::Enabled,
            Some("Disabled") => Self::Disabled,
            _ => Self::Unknown,
        })
    }
}

/// A registered webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint ID, assigned at creation.
    pub id: Uuid,
    /// Free-text label.
    pub description: Option<String>,
    /// Creation time, Unix epoch milliseconds (UTC).
    pub created: i64,
    /// Event names or regex patterns this endpoint subscribes to.
    #[serde(default)]
    pub enabled_events: Vec<String>,
    #[serde(default)]
    pub status: EndpointStatus,
    /// Delivery target.
    pub url: String,
    /// Shared secret, generated once at creation.
    pub secret: String,
}

impl Endpoint {
    /// Create a new enabled endpoint with a fresh id and creation time.
    pub fn new(
        url: impl Into<String>,
        description: Option<String>,
        enabled_events: Vec<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            created: chrono::Utc::now().timestamp_millis(),
            enabled_events,
            status: EndpointStatus::Enabled,
            url: url.into(),
            secret: secret.into(),
        }
    }

    /// Apply a partial update. Absent fields are left unchanged.
    pub fn apply(&mut self, changes: UpdateEndpoint) {
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(url) = changes.url {
            self.url = url;
        }
        if let Some(enabled_events) = changes.enabled_events {
            self.enabled_events = enabled_events;
        }
        if let Some(disable) = changes.disable {
            self.status = if disable {
                EndpointStatus::Disabled
            } else {
                EndpointStatus::Enabled
            };
        }
    }
}

/// Request body for creating an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEndpoint {
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub enabled_events: Vec<String>,
}

impl CreateEndpoint {
    pub fn new(url: impl Into<String>, enabled_events: Vec<String>) -> Self {
        Self {
            description: None,
            url: url.into(),
            enabled_events,
        }
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request body for a partial endpoint update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEndpoint {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled_events: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
    /// `true` disables the endpoint, `false` re-enables it.
    #[serde(default)]
    pub disable: Option<bool>,
}

impl UpdateEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enabled_events(mut self, enabled_events: Vec<String>) -> Self {
        self.enabled_events = Some(enabled_events);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_disable(mut self, disable: bool) -> Self {
        self.disable = Some(disable);
        self
    }
}

/// The persisted document: a single object whose only field is the endpoint list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDocument {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
