//! Conversation analyzer - offline transcript scoring.
//!
//! Not part of the live gating path. Sends a historical rep/HCP
//! transcript to the backend and parses the scored rubric it returns.
//! The backend is instructed to emit bare JSON but routinely wraps it
//! in markdown fences or prose, so extraction is a dedicated step with
//! an explicit failure mode instead of ad hoc string cleanup.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::ChatBackend;
use crate::error::{GateError, GateResult};
use crate::prompts;

/// Score for one rubric dimension.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DimensionScore {
    pub score: f64,
    pub color: String,
    pub justification: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub dimension: String,
}

/// One coaching recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoachingItem {
    pub issue: String,
    pub recommendation: String,
    #[serde(default)]
    pub example: String,
}

/// Full scored analysis of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationAnalysis {
    pub overall_score: f64,
    pub overall_color: String,
    pub scores: HashMap<String, DimensionScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub coaching: Vec<CoachingItem>,
    #[serde(default)]
    pub conversation_summary: String,
    #[serde(default)]
    pub rep_name: String,
    #[serde(default)]
    pub doctor_name: String,
}

/// Bound raw model output to the outermost JSON object.
///
/// Tolerates markdown fences and surrounding prose; anything before the
/// first `{` and after the last `}` is discarded.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Scores rep/HCP transcripts against the coaching rubric.
pub struct ConversationAnalyzer {
    backend: Arc<ChatBackend>,
}

impl ConversationAnalyzer {
    pub fn new(backend: Arc<ChatBackend>) -> Self {
        Self { backend }
    }

    /// Analyze a transcript and return the scored rubric.
    pub async fn analyze(
        &self,
        conversation: &str,
        rep_name: &str,
        doctor_name: &str,
    ) -> GateResult<ConversationAnalysis> {
        let prompt = prompts::analyzer_request(conversation, rep_name, doctor_name);

        let raw = self
            .backend
            .complete(prompts::ANALYZER_SYSTEM, &prompt)
            .await?;

        tracing::debug!(raw_len = raw.len(), "Analyzer completion received");

        let json = extract_json_object(&raw).ok_or_else(|| {
            GateError::Extraction("no JSON object found in analyzer output".to_string())
        })?;

        let mut analysis: ConversationAnalysis = serde_json::from_str(json)
            .map_err(|e| GateError::Extraction(format!("invalid analysis payload: {e}")))?;

        analysis.rep_name = rep_name.to_string();
        analysis.doctor_name = doctor_name.to_string();

        tracing::info!(
            overall_score = analysis.overall_score,
            dimensions = analysis.scores.len(),
            "Conversation analyzed"
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "overall_score": 4.2,
        "overall_color": "green",
        "scores": {
            "compliance": {"score": 5.0, "color": "green", "justification": "Stayed on label", "examples": ["Our drug is approved for hyperlipidemia"], "dimension": "Compliance"}
        },
        "strengths": ["Clear data citations"],
        "improvements": ["Stronger close"],
        "coaching": [{"issue": "Weak CTA", "recommendation": "Ask for a follow-up meeting", "example": "Can we schedule 15 minutes next week?"}],
        "conversation_summary": "Productive intro call"
    }"#;

    #[test]
    fn test_extract_plain_object() {
        let extracted = extract_json_object(r#"{"a": 1}"#).unwrap();
        assert_eq!(extracted, r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_fenced_object() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_with_surrounding_prose() {
        let raw = "Here is the analysis:\n{\"a\": 1}\nLet me know if you need more.";
        assert_eq!(extract_json_object(raw).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_rejects_braceless_output() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
    }

    #[test]
    fn test_sample_analysis_parses() {
        let analysis: ConversationAnalysis = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(analysis.overall_score, 4.2);
        assert_eq!(analysis.scores["compliance"].score, 5.0);
        assert_eq!(analysis.coaching.len(), 1);
        assert_eq!(analysis.conversation_summary, "Productive intro call");
    }

    #[test]
    fn test_analysis_tolerates_missing_optional_fields() {
        let minimal = r#"{
            "overall_score": 3.0,
            "overall_color": "yellow",
            "scores": {}
        }"#;

        let analysis: ConversationAnalysis = serde_json::from_str(minimal).unwrap();
        assert!(analysis.strengths.is_empty());
        assert!(analysis.coaching.is_empty());
    }
}
