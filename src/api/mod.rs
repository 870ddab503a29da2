//! REST API.
//!
//! Exposes every record type as JSON endpoints under `/api/`. The router
//! is composable: `api_router()` returns a `Router` that `build_app`
//! merges with the HTML pages and mounts on one axum server.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server_on, ClinicServer, ServerSession};
pub use types::ApiContext;
