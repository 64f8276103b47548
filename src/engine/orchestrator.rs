//! Orchestrator - composes the compliance-gated pipeline.
//!
//! This is the central component: it runs the pre-check, routes to a
//! generation role, and re-validates the candidate before anything
//! reaches the caller. Non-compliant input is never forwarded to
//! generation, and generated content never skips the second checkpoint.

use std::time::Instant;

use crate::domain::{ComplianceOutcome, HcpContext, PipelineResult};
use crate::engine::{AgentRegistry, AgentRouter, PolicyGuardian, GUARDIAN_AGENT};
use crate::error::GateError;

/// Runs the end-to-end pipeline for one request.
pub struct Orchestrator {
    guardian: PolicyGuardian,
    router: AgentRouter,
    registry: AgentRegistry,
}

impl Orchestrator {
    pub fn new(guardian: PolicyGuardian, router: AgentRouter, registry: AgentRegistry) -> Self {
        Self {
            guardian,
            router,
            registry,
        }
    }

    /// Process a query through the full pipeline.
    ///
    /// Pipeline order:
    /// 1. Guardian pre-check on the query alone
    /// 2. Router selects the generation role
    /// 3. The role's generator produces a candidate
    /// 4. Guardian post-check on the candidate
    ///
    /// A block is a successful execution whose business outcome is
    /// BLOCKED; only infrastructure failures return `Err`.
    pub async fn process(
        &self,
        query: &str,
        caller_id: &str,
        context: Option<&HcpContext>,
    ) -> Result<PipelineResult, GateError> {
        let started = Instant::now();

        let pre_check = self.guardian.evaluate(query, "");
        tracing::debug!(
            caller_id,
            blocked = pre_check.is_blocked(),
            "Query checkpoint complete"
        );

        if pre_check.is_blocked() {
            tracing::info!(
                caller_id,
                violation_type = ?pre_check.violation_type,
                "Query blocked before generation"
            );
            return Ok(blocked_result(
                pre_check,
                vec![GUARDIAN_AGENT.to_string()],
                started,
            ));
        }

        let role = self.router.select_role(query);
        tracing::debug!(caller_id, role = %role, "Role selected");

        let generator = self
            .registry
            .generator_for(role)
            .ok_or_else(|| GateError::RoleNotImplemented(role.to_string()))?;

        let candidate = generator.generate(query, caller_id, context).await?;
        tracing::debug!(
            caller_id,
            candidate_len = candidate.len(),
            "Candidate generated"
        );

        let agents_used = vec![role.agent_label(), GUARDIAN_AGENT.to_string()];

        let post_check = self.guardian.evaluate(query, &candidate);
        if post_check.is_blocked() {
            tracing::info!(
                caller_id,
                violation_type = ?post_check.violation_type,
                "Generated response blocked"
            );
            return Ok(blocked_result(post_check, agents_used, started));
        }

        let elapsed = elapsed_seconds(started);
        tracing::info!(
            caller_id,
            role = %role,
            elapsed_seconds = elapsed,
            "Query approved"
        );

        Ok(PipelineResult {
            response_text: candidate,
            agents_used,
            compliance: post_check,
            elapsed_seconds: elapsed,
        })
    }
}

fn blocked_result(
    outcome: ComplianceOutcome,
    agents_used: Vec<String>,
    started: Instant,
) -> PipelineResult {
    let explanation = outcome.explanation.clone().unwrap_or_default();

    PipelineResult {
        response_text: educational_block_message(&explanation),
        agents_used,
        compliance: outcome,
        elapsed_seconds: elapsed_seconds(started),
    }
}

fn elapsed_seconds(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0
}

/// The templated block message. Callers may render this verbatim, so
/// its shape is part of the API contract.
fn educational_block_message(explanation: &str) -> String {
    format!(
        r#"⚠️ **COMPLIANCE ALERT**

This request was blocked to protect you from regulatory risk.

**Why this was blocked:**
{explanation}

**What you can say instead:**
"Our drug is FDA-approved for the treatment of hyperlipidemia in adults. For questions about other potential applications, I'd be happy to connect you with our Medical Science Liaison team who can provide published clinical data."

**Learn More:**
- FDA regulations on promotional activities (21 CFR 202.1)
- How to handle off-label questions from HCPs
- Compliant ways to discuss competitor products

**Important:** This interaction has been logged for training purposes. There is no penalty for asking questions—we want you to learn!
"#
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::{ComplianceConfig, RoutingConfig};
    use crate::domain::{ComplianceStatus, DetectionSide, ViolationType};
    use crate::engine::{
        AgentRole, GenerationError, OffLabelDetector, ResponseGenerator,
    };

    struct MockGenerator {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ResponseGenerator for MockGenerator {
        async fn generate(
            &self,
            _query: &str,
            _caller_id: &str,
            _context: Option<&HcpContext>,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ResponseGenerator for FailingGenerator {
        async fn generate(
            &self,
            _query: &str,
            _caller_id: &str,
            _context: Option<&HcpContext>,
        ) -> Result<String, GenerationError> {
            Err(GenerationError::Backend {
                status: 503,
                body: "upstream unavailable".to_string(),
            })
        }
    }

    fn make_orchestrator(generator: Arc<dyn ResponseGenerator>) -> Orchestrator {
        let detector = OffLabelDetector::from_policy(&ComplianceConfig::default()).unwrap();
        let guardian = PolicyGuardian::new(detector);
        let router = AgentRouter::from_config(&RoutingConfig::default());

        let mut registry = AgentRegistry::new();
        registry.register(AgentRole::Sales, generator);

        Orchestrator::new(guardian, router, registry)
    }

    fn mock(reply: &str) -> (Arc<dyn ResponseGenerator>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = Arc::new(MockGenerator {
            reply: reply.to_string(),
            calls: calls.clone(),
        });
        (generator, calls)
    }

    #[tokio::test]
    async fn test_non_compliant_query_never_reaches_generation() {
        let (generator, calls) = mock("unused");
        let orchestrator = make_orchestrator(generator);

        let result = orchestrator
            .process("Can I tell doctors this helps migraines too?", "rep-1", None)
            .await
            .unwrap();

        assert_eq!(result.compliance.status, ComplianceStatus::Blocked);
        assert_eq!(
            result.compliance.violation_type,
            Some(ViolationType::UnapprovedIndication)
        );
        assert_eq!(result.compliance.detected_in, Some(DetectionSide::Query));
        assert_eq!(result.agents_used, vec!["policy_guardian".to_string()]);
        assert!(result.response_text.contains("COMPLIANCE ALERT"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clean_query_and_candidate_approved() {
        let (generator, calls) = mock(
            "Acknowledge the cost concern, then pivot to the total cost of care data.",
        );
        let orchestrator = make_orchestrator(generator);

        let result = orchestrator
            .process("How do I handle a cost objection?", "rep-1", None)
            .await
            .unwrap();

        assert_eq!(result.compliance.status, ComplianceStatus::Approved);
        assert_eq!(
            result.agents_used,
            vec!["sales_agent".to_string(), "policy_guardian".to_string()]
        );
        assert!(result.response_text.contains("total cost of care"));
        assert!(result.elapsed_seconds >= 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_compliant_candidate_blocked_at_response() {
        let (generator, calls) = mock("Some doctors use it for migraine prevention as well.");
        let orchestrator = make_orchestrator(generator);

        let result = orchestrator
            .process("How should I position the product?", "rep-1", None)
            .await
            .unwrap();

        assert_eq!(result.compliance.status, ComplianceStatus::Blocked);
        assert_eq!(result.compliance.detected_in, Some(DetectionSide::Response));
        // The role agent acted before the guardian's final pass.
        assert_eq!(
            result.agents_used,
            vec!["sales_agent".to_string(), "policy_guardian".to_string()]
        );
        assert!(result.response_text.contains("COMPLIANCE ALERT"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disclaimed_condition_passes_pre_check() {
        let (generator, calls) = mock("Stick to the approved indications when responding.");
        let orchestrator = make_orchestrator(generator);

        let result = orchestrator
            .process(
                "A doctor asked about weight loss. I said it's not approved for weight loss, but how should I follow up?",
                "rep-1",
                None,
            )
            .await
            .unwrap();

        // The exception phrase exempts the condition mention, so the
        // pipeline continues to generation.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.compliance.status, ComplianceStatus::Approved);
    }

    #[tokio::test]
    async fn test_generation_failure_is_not_a_block() {
        let orchestrator = make_orchestrator(Arc::new(FailingGenerator));

        let err = orchestrator
            .process("How do I handle a cost objection?", "rep-1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Generation(_)));
    }

    #[tokio::test]
    async fn test_unwired_role_fails_not_implemented() {
        let (generator, calls) = mock("unused");
        let orchestrator = make_orchestrator(generator);

        let err = orchestrator
            .process("Explain the mechanism of action", "rep-1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::RoleNotImplemented(ref role) if role == "medical"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blocked_result_still_reports_elapsed() {
        let (generator, _) = mock("unused");
        let orchestrator = make_orchestrator(generator);

        let result = orchestrator
            .process("What about investigational use?", "rep-1", None)
            .await
            .unwrap();

        assert!(result.compliance.is_blocked());
        assert!(result.elapsed_seconds >= 0.0);
    }
}
