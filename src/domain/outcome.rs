//! Compliance outcome types.
//!
//! An outcome is the guardian's per-request judgment, derived from one
//! or two violation verdicts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ViolationType, ViolationVerdict};

/// Final compliance status for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Approved,
    Blocked,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Approved => write!(f, "APPROVED"),
            ComplianceStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// Which side of the exchange triggered a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSide {
    Query,
    Response,
}

impl std::fmt::Display for DetectionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionSide::Query => write!(f, "query"),
            DetectionSide::Response => write!(f, "response"),
        }
    }
}

/// The guardian's judgment for a request.
///
/// Invariant: `status == Blocked` iff `violation_type` is `Some`. The
/// constructors are the only way components build outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceOutcome {
    pub status: ComplianceStatus,
    pub violation_type: Option<ViolationType>,
    pub explanation: Option<String>,
    pub detected_in: Option<DetectionSide>,
}

impl ComplianceOutcome {
    /// All checkpoints passed.
    pub fn approved() -> Self {
        Self {
            status: ComplianceStatus::Approved,
            violation_type: None,
            explanation: None,
            detected_in: None,
        }
    }

    /// A checkpoint found a violation.
    pub fn blocked(verdict: &ViolationVerdict, detected_in: DetectionSide) -> Self {
        Self {
            status: ComplianceStatus::Blocked,
            violation_type: verdict.violation_type,
            explanation: Some(verdict.explanation.clone()),
            detected_in: Some(detected_in),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == ComplianceStatus::Blocked
    }
}
