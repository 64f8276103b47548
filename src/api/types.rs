//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ComplianceOutcome, ComplianceStatus, HcpContext, PipelineResult, ViolationType,
};
use crate::engine::ConversationAnalysis;

// ==================== Query ====================

/// A rep's question for the agent system.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Natural-language question.
    pub query: String,
    /// ID of the rep asking.
    pub caller_id: String,
    /// Context about the HCP being discussed (optional).
    #[serde(default)]
    pub hcp_context: Option<HcpContext>,
}

/// Compliance status as exposed to callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplianceCheck {
    pub status: ComplianceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_type: Option<ViolationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<&ComplianceOutcome> for ComplianceCheck {
    fn from(outcome: &ComplianceOutcome) -> Self {
        Self {
            status: outcome.status,
            violation_type: outcome.violation_type,
            explanation: outcome.explanation.clone(),
        }
    }
}

/// Complete query response with compliance info.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    /// The original question, echoed back.
    pub query: String,
    /// Final answer, or the educational block message.
    pub response: String,
    /// Participants, in the order they acted.
    pub agents_used: Vec<String>,
    /// Compliance judgment.
    pub compliance_status: ComplianceCheck,
    /// End-to-end processing time.
    pub response_time_seconds: f64,
}

impl QueryResponse {
    pub fn from_result(query: String, result: PipelineResult) -> Self {
        Self {
            query,
            response: result.response_text,
            agents_used: result.agents_used,
            compliance_status: ComplianceCheck::from(&result.compliance),
            response_time_seconds: result.elapsed_seconds,
        }
    }
}

// ==================== Conversation analysis ====================

/// Request to score a historical conversation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeConversationRequest {
    /// Full transcript text.
    pub conversation: String,
    /// Rep display name.
    #[serde(default)]
    pub rep_name: Option<String>,
    /// HCP display name.
    #[serde(default)]
    pub doctor_name: Option<String>,
}

/// Scored analysis response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeConversationResponse {
    #[serde(flatten)]
    pub analysis: ConversationAnalysis,
}

// ==================== Health and status ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether a backend API key is configured.
    pub backend_configured: bool,
    /// Timestamp.
    pub timestamp: String,
}

/// Status of one agent in the roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct AgentStatus {
    pub name: String,
    pub status: String,
    pub version: String,
}

/// Roster of agents and overall system status.
#[derive(Debug, Serialize, ToSchema)]
pub struct AgentsStatusResponse {
    pub total_agents: usize,
    pub agents: Vec<AgentStatus>,
    pub system_status: String,
    pub backend_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionSide, ViolationVerdict};

    #[test]
    fn test_blocked_response_shape() {
        let verdict = ViolationVerdict::violation(
            ViolationType::ExplicitOffLabel,
            "off-label",
            "Text contains explicit off-label language: 'off-label'",
        );
        let result = PipelineResult {
            response_text: "blocked message".to_string(),
            agents_used: vec!["policy_guardian".to_string()],
            compliance: ComplianceOutcome::blocked(&verdict, DetectionSide::Query),
            elapsed_seconds: 0.004,
        };

        let response = QueryResponse::from_result("the query".to_string(), result);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["compliance_status"]["status"], "BLOCKED");
        assert_eq!(
            json["compliance_status"]["violation_type"],
            "explicit_off_label"
        );
        assert_eq!(json["agents_used"][0], "policy_guardian");
    }

    #[test]
    fn test_approved_response_omits_violation_fields() {
        let result = PipelineResult {
            response_text: "answer".to_string(),
            agents_used: vec![
                "sales_agent".to_string(),
                "policy_guardian".to_string(),
            ],
            compliance: ComplianceOutcome::approved(),
            elapsed_seconds: 1.25,
        };

        let json =
            serde_json::to_value(QueryResponse::from_result("q".to_string(), result)).unwrap();

        assert_eq!(json["compliance_status"]["status"], "APPROVED");
        assert!(json["compliance_status"].get("violation_type").is_none());
        assert!(json["compliance_status"].get("explanation").is_none());
    }
}
