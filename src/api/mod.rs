//! HTTP API layer for RxGate.
//!
//! Provides REST endpoints for query processing and conversation
//! analysis.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
