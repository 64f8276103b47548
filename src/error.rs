//! Error types for RxGate.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.
//! A compliance block is not an error: blocked requests complete the
//! pipeline and return a well-formed result with success semantics.
//! Only infrastructure failures surface through this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::engine::GenerationError;

/// Unified error type for RxGate operations.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Agent role not wired to a generation path: {0}")]
    RoleNotImplemented(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Structured output extraction failed: {0}")]
    Extraction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            GateError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            GateError::Generation(e) => {
                tracing::error!(error = %e, "Generation backend failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "The generation backend could not produce a response".to_string(),
                    Some(e.to_string()),
                )
            }
            GateError::RoleNotImplemented(role) => (
                StatusCode::NOT_IMPLEMENTED,
                "ROLE_NOT_IMPLEMENTED",
                format!("No generation path is wired for the '{role}' role yet"),
                None,
            ),
            GateError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            GateError::Extraction(msg) => (
                StatusCode::BAD_GATEWAY,
                "EXTRACTION_ERROR",
                "The backend returned output that could not be parsed".to_string(),
                Some(msg.clone()),
            ),
            GateError::Serialization(e) => (
                StatusCode::BAD_REQUEST,
                "SERIALIZATION_ERROR",
                "Failed to process request/response".to_string(),
                Some(e.to_string()),
            ),
            GateError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for RxGate operations.
pub type GateResult<T> = Result<T, GateError>;
