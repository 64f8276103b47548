//! Instruction templates for the generation agents.
//!
//! Role-specific system prompts plus the per-request user message
//! formatting. Product knowledge is embedded for the demo product; a
//! multi-product deployment would load this per drug.

use crate::domain::HcpContext;

/// Product knowledge sheet injected into the sales agent prompt.
pub const PRODUCT_KNOWLEDGE: &str = r#"PRODUCT: CardioStatin (atorvastatin calcium advanced formulation)
FDA APPROVED FOR: Treatment of hyperlipidemia, reduction of cardiovascular risk in adults

KEY CLINICAL DATA:
1. EFFICACY:
   - 42% reduction in LDL cholesterol vs baseline (JAMA Cardiology 2024)
   - 31% reduction in major adverse cardiac events vs older statins (2-year RCT)
   - Superior LDL reduction: 58mg/dL average decrease

2. SAFETY & TOLERABILITY:
   - 42% lower muscle-related side effects vs first-generation statins
   - 67% lower discontinuation rate due to side effects
   - Well-tolerated in elderly (65+) and renal impairment patients

3. ADHERENCE & OUTCOMES:
   - 78% medication adherence at 12 months (vs 54% for older statins)
   - Real-world evidence: 30% fewer ER visits in CardioStatin patients
   - 24% fewer hospitalizations over 24 months

4. ECONOMIC VALUE:
   - Total cost of care: $8,400 LESS per patient over 2 years despite higher drug cost
   - Break-even: One prevented hospitalization ($48,000 avg) = 3 years medication cost difference
   - Patient assistance program: Covers up to 80% of out-of-pocket costs for qualifying patients

COMPETITOR COMPARISON (vs Generic Atorvastatin):
- Efficacy: 15% greater LDL reduction
- Side effects: 42% fewer myalgias
- Adherence: 24 percentage points higher at 12 months
- Cost: $120/month vs $15/month (generic), BUT $8,400 lower total cost over 2 years"#;

const SALES_AGENT_SYSTEM: &str = r#"You are an expert pharmaceutical sales strategist specializing in cardiovascular medications.

PRODUCT KNOWLEDGE:
{product_data}

When answering questions:
1. BE SPECIFIC: Cite actual studies, percentages, dollar amounts from the data above
2. PERSONALIZE: Reference the HCP's name and specialty when provided
3. STRUCTURE: Use clear frameworks (acknowledge, then data, then value, then action)
4. CONCRETE: Give exact phrases to say, not generic advice like "highlight benefits"

Never discuss uses outside the approved indications. For questions about other
potential applications, direct the rep to the Medical Science Liaison team.

Provide a strategic, specific, data-driven response."#;

/// System prompt for the sales agent, with product data inlined.
pub fn sales_agent_system() -> String {
    SALES_AGENT_SYSTEM.replace("{product_data}", PRODUCT_KNOWLEDGE)
}

/// Per-request user message for the sales agent.
pub fn sales_agent_request(query: &str, caller_id: &str, context: Option<&HcpContext>) -> String {
    let hcp_info = match context {
        Some(ctx) => {
            let name = ctx.name.as_deref().unwrap_or("the doctor");
            match ctx.specialty.as_deref() {
                Some(specialty) if !specialty.is_empty() => {
                    format!("HCP: {name}, {specialty}")
                }
                _ => format!("HCP: {name}"),
            }
        }
        None => "HCP: Not specified".to_string(),
    };

    format!("Rep: {caller_id}\n{hcp_info}\nQuestion: {query}")
}

/// System prompt for the conversation analyzer.
pub const ANALYZER_SYSTEM: &str =
    "You are a pharmaceutical sales conversation analyst. Return ONLY valid JSON, no markdown.";

const ANALYZER_PROMPT: &str = r#"Analyze this pharmaceutical sales conversation and return ONLY a JSON object (no markdown, no extra text):

{
  "overall_score": 4.2,
  "overall_color": "green",
  "scores": {
    "compliance": {"score": 5.0, "color": "green", "justification": "...", "examples": ["Quote"], "dimension": "Compliance"},
    "tone": {"score": 4.5, "color": "green", "justification": "...", "examples": ["Quote"], "dimension": "Tone & Professionalism"},
    "knowledge": {"score": 4.0, "color": "green", "justification": "...", "examples": ["Quote"], "dimension": "Product Knowledge"},
    "objection_handling": {"score": 3.5, "color": "yellow", "justification": "...", "examples": ["Quote"], "dimension": "Objection Handling"},
    "relationship": {"score": 4.5, "color": "green", "justification": "...", "examples": ["Quote"], "dimension": "Relationship Building"},
    "call_to_action": {"score": 3.8, "color": "yellow", "justification": "...", "examples": ["Quote"], "dimension": "Call-to-Action"}
  },
  "strengths": ["Strength 1", "Strength 2", "Strength 3"],
  "improvements": ["Improvement 1", "Improvement 2", "Improvement 3"],
  "coaching": [
    {"issue": "Issue description", "recommendation": "What to do", "example": "Example response"}
  ],
  "conversation_summary": "Brief summary"
}

Score each dimension 0-5. Use color: "green" (>=4.0), "yellow" (3.0-3.9), "red" (<3.0).

Conversation:
{conversation}

Rep: {rep_name}
Doctor: {doctor_name}
Product: CardioStatin

Return ONLY the JSON object."#;

/// Per-request user message for the conversation analyzer.
pub fn analyzer_request(conversation: &str, rep_name: &str, doctor_name: &str) -> String {
    ANALYZER_PROMPT
        .replace("{conversation}", conversation)
        .replace("{rep_name}", rep_name)
        .replace("{doctor_name}", doctor_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_system_embeds_product_data() {
        let system = sales_agent_system();
        assert!(system.contains("CardioStatin"));
        assert!(!system.contains("{product_data}"));
    }

    #[test]
    fn test_sales_request_with_context() {
        let ctx = HcpContext {
            name: Some("Dr. Chen".to_string()),
            specialty: Some("Cardiology".to_string()),
        };
        let msg = sales_agent_request("How do I open the call?", "rep-42", Some(&ctx));
        assert!(msg.contains("Dr. Chen, Cardiology"));
        assert!(msg.contains("rep-42"));
    }

    #[test]
    fn test_sales_request_without_context() {
        let msg = sales_agent_request("How do I open the call?", "rep-42", None);
        assert!(msg.contains("HCP: Not specified"));
    }

    #[test]
    fn test_analyzer_request_substitution() {
        let msg = analyzer_request("Rep: hi\nDr: hello", "Jordan", "Dr. Patel");
        assert!(msg.contains("Rep: Jordan"));
        assert!(msg.contains("Doctor: Dr. Patel"));
        assert!(!msg.contains("{conversation}"));
    }
}
