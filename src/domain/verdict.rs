//! Violation verdict types.
//!
//! A verdict is the detector's per-text judgment. It is produced fresh
//! for every call and is never partially filled: either every violation
//! field is populated, or none are.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Categories of off-label promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Explicit off-label language ("off-label", "unapproved use", ...).
    ExplicitOffLabel,
    /// Hedged or indirect suggestion of off-label use.
    ImplicitOffLabel,
    /// Mention of a condition outside the approved indications.
    UnapprovedIndication,
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationType::ExplicitOffLabel => write!(f, "explicit_off_label"),
            ViolationType::ImplicitOffLabel => write!(f, "implicit_off_label"),
            ViolationType::UnapprovedIndication => write!(f, "unapproved_indication"),
        }
    }
}

/// The detector's judgment for a single piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationVerdict {
    pub is_violation: bool,
    pub violation_type: Option<ViolationType>,
    pub detected_text: Option<String>,
    pub explanation: String,
}

impl ViolationVerdict {
    /// A no-violation verdict with the fixed explanatory message.
    pub fn clean() -> Self {
        Self {
            is_violation: false,
            violation_type: None,
            detected_text: None,
            explanation: "No off-label promotion detected".to_string(),
        }
    }

    /// A fully-populated violation verdict.
    pub fn violation(
        violation_type: ViolationType,
        detected_text: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            is_violation: true,
            violation_type: Some(violation_type),
            detected_text: Some(detected_text.into()),
            explanation: explanation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_verdict_has_no_violation_fields() {
        let verdict = ViolationVerdict::clean();
        assert!(!verdict.is_violation);
        assert!(verdict.violation_type.is_none());
        assert!(verdict.detected_text.is_none());
        assert_eq!(verdict.explanation, "No off-label promotion detected");
    }

    #[test]
    fn test_violation_verdict_is_fully_populated() {
        let verdict = ViolationVerdict::violation(
            ViolationType::ExplicitOffLabel,
            "off-label",
            "Text contains explicit off-label language: 'off-label'",
        );
        assert!(verdict.is_violation);
        assert_eq!(verdict.violation_type, Some(ViolationType::ExplicitOffLabel));
        assert_eq!(verdict.detected_text.as_deref(), Some("off-label"));
    }

    #[test]
    fn test_violation_type_serialization() {
        let json = serde_json::to_string(&ViolationType::UnapprovedIndication).unwrap();
        assert_eq!(json, "\"unapproved_indication\"");
    }
}
