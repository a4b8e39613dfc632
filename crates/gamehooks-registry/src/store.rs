//! Endpoint persistence store.
//!
//! Endpoints live in memory and in a single JSON document on disk. Every
//! mutation rewrites the whole document before returning, so a reader of
//! the file after a call completes sees the new state.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::RegistryError;
use crate::types::{Endpoint, EndpointDocument, UpdateEndpoint};

/// Borrowed view of [`EndpointDocument`] used for writing.
#[derive(Serialize)]
struct DocumentRef<'a> {
    endpoints: &'a [Endpoint],
}

/// File-backed endpoint store.
///
/// A single mutex guards the list; each mutating operation holds it for the
/// whole read, mutate and persist sequence so concurrent calls cannot lose
/// each other's updates.
pub struct EndpointStore {
    path: PathBuf,
    endpoints: Mutex<Vec<Endpoint>>,
}

impl EndpointStore {
    /// Open the store at `path`, loading the document if it exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();
        let endpoints = read_document(&path).await?;
        info!("Loaded {} webhook endpoint(s) from {:?}", endpoints.len(), path);

        Ok(Self {
            path,
            endpoints: Mutex::new(endpoints),
        })
    }

    /// Location of the endpoint document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload from disk if the in-memory list is empty.
    ///
    /// Recovers from a store that was opened before the document existed.
    async fn ensure_loaded(&self, endpoints: &mut Vec<Endpoint>) -> Result<(), RegistryError> {
        if endpoints.is_empty() {
            *endpoints = read_document(&self.path).await?;
            if !endpoints.is_empty() {
                debug!(
                    "Reloaded {} endpoint(s) from {:?}",
                    endpoints.len(),
                    self.path
                );
            }
        }
        Ok(())
    }

    /// Re-read the document unconditionally, replacing the in-memory list.
    pub async fn reload(&self) -> Result<usize, RegistryError> {
        let mut endpoints = self.endpoints.lock().await;
        *endpoints = read_document(&self.path).await?;
        Ok(endpoints.len())
    }

    /// Create an endpoint and persist it.
    pub async fn create(
        &self,
        url: impl Into<String>,
        description: Option<String>,
        enabled_events: Vec<String>,
        secret: impl Into<String>,
    ) -> Result<Endpoint, RegistryError> {
        let endpoint = Endpoint::new(url, description, enabled_events, secret);

        let mut endpoints = self.endpoints.lock().await;
        self.ensure_loaded(&mut endpoints).await?;

        endpoints.push(endpoint.clone());
        if let Err(e) = self.persist(&endpoints).await {
            endpoints.pop();
            return Err(e);
        }

        debug!("Created endpoint {} -> {}", endpoint.id, endpoint.url);
        Ok(endpoint)
    }

    /// Look up an endpoint by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<Endpoint>, RegistryError> {
        let mut endpoints = self.endpoints.lock().await;
        self.ensure_loaded(&mut endpoints).await?;
        Ok(endpoints.iter().find(|e| e.id == id).cloned())
    }

    /// Apply a partial update. Returns `None` if no endpoint has `id`.
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateEndpoint,
    ) -> Result<Option<Endpoint>, RegistryError> {
        let mut endpoints = self.endpoints.lock().await;
        self.ensure_loaded(&mut endpoints).await?;

        let Some(index) = endpoints.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let previous = endpoints[index].clone();
        endpoints[index].apply(changes);

        if let Err(e) = self.persist(&endpoints).await {
            endpoints[index] = previous;
            return Err(e);
        }

        debug!("Updated endpoint {}", id);
        Ok(Some(endpoints[index].clone()))
    }

    /// Delete an endpoint. Returns whether one was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RegistryError> {
        let mut endpoints = self.endpoints.lock().await;
        self.ensure_loaded(&mut endpoints).await?;

        let Some(index) = endpoints.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = endpoints.remove(index);
        if let Err(e) = self.persist(&endpoints).await {
            endpoints.insert(index, removed);
            return Err(e);
        }

        debug!("Deleted endpoint {}", id);
        Ok(true)
    }

    /// All endpoints in insertion order.
    pub async fn list(&self) -> Result<Vec<Endpoint>, RegistryError> {
        let mut endpoints = self.endpoints.lock().await;
        self.ensure_loaded(&mut endpoints).await?;
        Ok(endpoints.clone())
    }

    /// Number of endpoints held in memory.
    pub async fn len(&self) -> usize {
        self.endpoints.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.endpoints.lock().await.is_empty()
    }

    /// Rewrite the whole document.
    ///
    /// Written to a sibling temporary file and renamed into place so a crash
    /// mid-write leaves the previous document intact.
    async fn persist(&self, endpoints: &[Endpoint]) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&DocumentRef { endpoints })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("Saved {} endpoint(s) to {:?}", endpoints.len(), self.path);
        Ok(())
    }
}

/// Read the endpoint document. A missing or blank file is an empty list.
async fn read_document(path: &Path) -> Result<Vec<Endpoint>, RegistryError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: EndpointDocument = serde_json::from_str(&content)?;
    Ok(document.endpoints)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
