//! Compliance engine for RxGate.
//!
//! This module contains the gated generation pipeline:
//! - Violation Detector: layered off-label pattern cascade
//! - Policy Guardian: two-checkpoint query/response protocol
//! - Agent Router: keyword dispatch table from query to role
//! - Response Generator: boundary to the generative text backend
//! - Orchestrator: composes all of the above per request
//! - Conversation Analyzer: offline transcript scoring

mod analyzer;
mod detector;
mod generator;
mod guardian;
mod orchestrator;
mod router;

pub use analyzer::*;
pub use detector::*;
pub use generator::*;
pub use guardian::*;
pub use orchestrator::*;
pub use router::*;
