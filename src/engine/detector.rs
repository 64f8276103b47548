//! Off-label violation detector.
//!
//! The first layer of the compliance pipeline: a pure, deterministic
//! pattern cascade over a single piece of text. Matchers are an explicit
//! ordered list; the first one to find a violation wins and later layers
//! are never consulted.

use regex::{Regex, RegexBuilder};

use crate::config::ComplianceConfig;
use crate::domain::{ViolationType, ViolationVerdict};

/// A single detection layer.
///
/// Implementations receive text that has already been lowercased and
/// return `Some` verdict on a match, `None` to pass to the next layer.
pub trait ViolationMatcher: Send + Sync {
    /// Layer name, for logging.
    fn name(&self) -> &'static str;

    /// Scan the (lowercased) text for a violation.
    fn scan(&self, text: &str) -> Option<ViolationVerdict>;
}

/// Layer 1: explicit off-label phrases, exact substring match.
pub struct ExplicitKeywordMatcher {
    keywords: Vec<String>,
}

impl ExplicitKeywordMatcher {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl ViolationMatcher for ExplicitKeywordMatcher {
    fn name(&self) -> &'static str {
        "explicit_keywords"
    }

    fn scan(&self, text: &str) -> Option<ViolationVerdict> {
        self.keywords.iter().find(|kw| text.contains(kw.as_str())).map(|kw| {
            ViolationVerdict::violation(
                ViolationType::ExplicitOffLabel,
                kw.clone(),
                format!("Text contains explicit off-label language: '{kw}'"),
            )
        })
    }
}

/// Layer 2: regular expressions catching indirect off-label suggestions.
pub struct ImplicitPatternMatcher {
    patterns: Vec<Regex>,
}

impl ImplicitPatternMatcher {
    /// Compile the configured patterns. An invalid pattern is a
    /// configuration error, surfaced at startup.
    pub fn new(patterns: &[String]) -> Result<Self, String> {
        let compiled = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| format!("invalid implicit pattern '{p}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns: compiled })
    }
}

impl ViolationMatcher for ImplicitPatternMatcher {
    fn name(&self) -> &'static str {
        "implicit_patterns"
    }

    fn scan(&self, text: &str) -> Option<ViolationVerdict> {
        self.patterns.iter().find_map(|pattern| {
            pattern.find(text).map(|m| {
                let span = m.as_str();
                ViolationVerdict::violation(
                    ViolationType::ImplicitOffLabel,
                    span,
                    format!("Text contains implicit off-label suggestion: '{span}'"),
                )
            })
        })
    }
}

/// Layer 3: mentions of conditions outside the approved indications.
///
/// A mention is exempted when a disclaiming phrase (e.g. "not approved
/// for") is co-located in the same text, so a rep correctly declining an
/// off-label question is not penalized.
pub struct UnapprovedIndicationMatcher {
    conditions: Vec<String>,
    approved_indications: Vec<String>,
    exception_phrases: Vec<String>,
}

impl UnapprovedIndicationMatcher {
    pub fn new(
        conditions: Vec<String>,
        approved_indications: Vec<String>,
        exception_phrases: Vec<String>,
    ) -> Self {
        Self {
            conditions: conditions.into_iter().map(|c| c.to_lowercase()).collect(),
            approved_indications,
            exception_phrases: exception_phrases
                .into_iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    fn has_exception(&self, text: &str) -> bool {
        self.exception_phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

impl ViolationMatcher for UnapprovedIndicationMatcher {
    fn name(&self) -> &'static str {
        "unapproved_indications"
    }

    fn scan(&self, text: &str) -> Option<ViolationVerdict> {
        for condition in &self.conditions {
            if !text.contains(condition.as_str()) {
                continue;
            }
            if self.has_exception(text) {
                // Exempted mention, keep checking remaining conditions.
                continue;
            }
            return Some(ViolationVerdict::violation(
                ViolationType::UnapprovedIndication,
                condition.clone(),
                format!(
                    "Discussion of unapproved indication: '{condition}'. Approved uses: {}",
                    self.approved_indications.join(", ")
                ),
            ));
        }
        None
    }
}

/// The layered detector: an ordered matcher cascade, first match wins.
pub struct OffLabelDetector {
    matchers: Vec<Box<dyn ViolationMatcher>>,
}

impl std::fmt::Debug for OffLabelDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffLabelDetector")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

impl OffLabelDetector {
    /// Build the standard three-layer cascade from the policy tables.
    pub fn from_policy(policy: &ComplianceConfig) -> Result<Self, String> {
        let matchers: Vec<Box<dyn ViolationMatcher>> = vec![
            Box::new(ExplicitKeywordMatcher::new(policy.off_label_keywords.clone())),
            Box::new(ImplicitPatternMatcher::new(&policy.implicit_patterns)?),
            Box::new(UnapprovedIndicationMatcher::new(
                policy.off_label_conditions.clone(),
                policy.approved_indications.clone(),
                policy.context_exceptions.clone(),
            )),
        ];

        Ok(Self { matchers })
    }

    /// Build a detector from an explicit matcher list (layer order is
    /// the caller's responsibility).
    pub fn with_matchers(matchers: Vec<Box<dyn ViolationMatcher>>) -> Self {
        Self { matchers }
    }

    /// Detect potential off-label promotion in text.
    ///
    /// Deterministic, case-insensitive, defined for any input including
    /// the empty string. No per-call state.
    pub fn detect(&self, text: &str) -> ViolationVerdict {
        let lowered = text.to_lowercase();

        for matcher in &self.matchers {
            if let Some(verdict) = matcher.scan(&lowered) {
                tracing::debug!(
                    layer = matcher.name(),
                    violation_type = %verdict.violation_type.map(|v| v.to_string()).unwrap_or_default(),
                    "Violation detected"
                );
                return verdict;
            }
        }

        ViolationVerdict::clean()
    }
}
