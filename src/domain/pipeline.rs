//! Pipeline result types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ComplianceOutcome;

/// Optional caller-supplied context about the HCP being discussed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct HcpContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

/// The complete structured outcome of one orchestrator invocation.
///
/// Created per request, never cached, never shared across requests.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Final answer text, or the educational block message.
    pub response_text: String,
    /// Participants, in the order they acted.
    pub agents_used: Vec<String>,
    /// The guardian's judgment.
    pub compliance: ComplianceOutcome,
    /// End-to-end wall time, rounded to milliseconds.
    pub elapsed_seconds: f64,
}
