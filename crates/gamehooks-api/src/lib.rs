//! # GameHooks API
//!
//! HTTP surface for the webhook registry.
//!
//! - **Management**: endpoint CRUD and the event catalog, mounted under a
//!   configurable prefix
//! - **Ingest**: `POST /events/{name}` lets the host fire events over HTTP
//! - **Probes**: `GET /livez`
//!
//! ## Route Structure
//!
//! ```text
//! {prefix}                       (default /hooks)
//!   GET    {prefix}                    - List endpoints
//!   POST   {prefix}                    - Register endpoint
//!   GET    {prefix}/available-events   - List catalog events
//!   GET    {prefix}/{id}               - Get endpoint
//!   POST   {prefix}/{id}               - Update endpoint
//!   DELETE {prefix}/{id}               - Delete endpoint
//!
//! POST /events/{name}  - Fire a host event
//! GET  /livez          - Liveness probe
//! ```

pub mod error;
pub mod events;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use events::EventAccepted;
pub use handlers::{AvailableEventsResponse, DeleteEndpointResponse, ListEndpointsResponse};
pub use routes::create_router;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
