//! Host event catalog.

use parking_lot::RwLock;

/// Source of the event names currently available for subscription.
///
/// Implemented by the host. The set may change over time; endpoints are
/// validated against it only when their patterns are written.
pub trait EventCatalog: Send + Sync {
    /// List all known event names.
    fn list_events(&self) -> Vec<String>;
}

/// In-memory catalog seeded from configuration.
///
/// Hosts that learn about events at runtime call [`register`](Self::register)
/// or [`replace`](Self::replace).
pub struct StaticEventCatalog {
    events: RwLock<Vec<String>>,
}

impl StaticEventCatalog {
    /// Create a catalog from an initial set of names. Duplicates are dropped.
    pub fn new(events: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let catalog = Self {
            events: RwLock::new(Vec::new()),
        };
        catalog.replace(events);
        catalog
    }

    /// Add an event name. Returns `false` if it was already present.
    pub fn register(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        let mut events = self.events.write();
        if events.contains(&name) {
            return false;
        }
        events.push(name);
        true
    }

    /// Replace the whole catalog.
    pub fn replace(&self, events: impl IntoIterator<Item = impl Into<String>>) {
        let mut deduped: Vec<String> = Vec::new();
        for name in events {
            let name = name.into();
            if !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        *self.events.write() = deduped;
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl Default for StaticEventCatalog {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl EventCatalog for StaticEventCatalog {
    fn list_events(&self) -> Vec<String> {
        self.events.read().clone()
    }
}
