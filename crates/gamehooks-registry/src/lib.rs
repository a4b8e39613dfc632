//! # GameHooks Registry
//!
//! Webhook registry and event dispatch engine.
//!
//! External operators register HTTP endpoints that receive JSON
//! notifications whenever named host events fire. This crate owns:
//!
//! - **Store**: durable CRUD of endpoint subscriptions backed by a JSON document
//! - **Patterns**: validation of subscription regexes against the host event catalog
//! - **Secrets**: per-endpoint shared secrets drawn from the OS CSPRNG
//! - **Dispatch**: fire-and-forget HTTP delivery, isolated per endpoint
//! - **Registry**: the facade composing all of the above
//!
//! ## Data flow
//!
//! ```text
//!  management request ──► WebhookRegistry ──► PatternMatcher ──► EndpointStore ──► disk
//!
//!  host event ──► WebhookRegistry::handle_event
//!                   │  filter Enabled endpoints whose patterns match
//!                   ├──► tokio task ──► Dispatcher ──► POST endpoint A
//!                   └──► tokio task ──► Dispatcher ──► POST endpoint B
//! ```

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod secret;
pub mod source;
pub mod store;
pub mod types;

pub use catalog::{EventCatalog, StaticEventCatalog};
pub use dispatcher::{DeliveryOutcome, DeliveryResult, Dispatcher, HttpDispatcher};
pub use error::RegistryError;
pub use pattern::PatternMatcher;
pub use registry::{DispatchBatch, WebhookRegistry};
pub use secret::generate_secret;
pub use source::{spawn_event_pump, HostEvent};
pub use store::EndpointStore;
pub use types::{CreateEndpoint, Endpoint, EndpointDocument, EndpointStatus, UpdateEndpoint};
