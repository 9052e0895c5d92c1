//! HTTP API for claim classification.
//!
//! The router is composable: `classifier_router()` returns a `Router` that
//! can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::classifier_router;
pub use server::{start_server, ClassifierServer};
pub use types::ApiContext;
