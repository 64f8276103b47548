//! Policy Guardian - the two-checkpoint compliance protocol.
//!
//! Checkpoint order is the central design decision of the system: the
//! query is judged before any generation happens, and generated content
//! gets a second, independent pass before it reaches the caller. A
//! compliant question can still provoke a non-compliant answer.

use crate::domain::{ComplianceOutcome, DetectionSide};
use crate::engine::OffLabelDetector;

/// Name under which the guardian appears in `agents_used`.
pub const GUARDIAN_AGENT: &str = "policy_guardian";

/// Applies the violation detector to both sides of an exchange.
pub struct PolicyGuardian {
    detector: OffLabelDetector,
}

impl PolicyGuardian {
    pub fn new(detector: OffLabelDetector) -> Self {
        Self { detector }
    }

    /// Evaluate a query/response pair.
    ///
    /// 1. Detect on the query alone; a violation blocks before any
    ///    generation is consulted (`detected_in = query`).
    /// 2. Only then detect on the response (`detected_in = response`).
    /// 3. Both clean means approved.
    ///
    /// The pre-check passes an empty response; `detect` is total, so the
    /// second checkpoint is a no-op in that case.
    pub fn evaluate(&self, query: &str, response: &str) -> ComplianceOutcome {
        let query_verdict = self.detector.detect(query);
        if query_verdict.is_violation {
            tracing::debug!(
                violation_type = ?query_verdict.violation_type,
                "Query failed compliance checkpoint"
            );
            return ComplianceOutcome::blocked(&query_verdict, DetectionSide::Query);
        }

        let response_verdict = self.detector.detect(response);
        if response_verdict.is_violation {
            tracing::debug!(
                violation_type = ?response_verdict.violation_type,
                "Generated response failed compliance checkpoint"
            );
            return ComplianceOutcome::blocked(&response_verdict, DetectionSide::Response);
        }

        ComplianceOutcome::approved()
    }
}
