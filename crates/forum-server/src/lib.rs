//! forum-server: hypermedia HTTP API for the threaded discussion forum.
//!
//! This crate is the resource and representation layer: it validates
//! requests, invokes the store, and renders responses in one of three
//! competing hypermedia profiles (Linked-JSON, HAL+JSON, Collection+JSON).
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON problem responses
//!
//! Each request flows controller → validator → store → representation
//! builder; the store handle is injected through [`AppState`], never read
//! from ambient state. Which builder a resource uses is fixed by the
//! static registry in [`media`], not negotiated per request.

pub mod config;
pub mod error;
pub mod fields;
pub mod history;
pub mod href;
pub mod media;
pub mod middleware;
pub mod represent;
pub mod routes;
pub mod state;
pub mod validate;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

// Re-export dependent crates
pub use forum_core;
pub use forum_store;
