use crate::application::use_cases::prompts;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::ticket::TicketAnalysis;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::extract_json_payload;
use std::sync::Arc;

pub struct AnalyzeTicketUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl AnalyzeTicketUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(&self, config: &LLMConfig, ticket_text: &str) -> Result<TicketAnalysis> {
        let ticket_text = ticket_text.trim();
        if ticket_text.is_empty() {
            return Err(AppError::ValidationError(
                "Ticket text is empty.".to_string(),
            ));
        }

        let system_prompt = prompts::build_analysis_system_prompt();
        let user_prompt = prompts::build_analysis_user_prompt(ticket_text);

        let raw = self
            .llm_client
            .generate_json(config, &system_prompt, &user_prompt)
            .await?;

        Ok(parse_analysis(&raw))
    }
}

/// Parses the model text as a `TicketAnalysis`, tolerating code fences.
/// Any parse failure substitutes the fixed fallback record; there is no
/// partial repair and no retry.
pub(crate) fn parse_analysis(raw: &str) -> TicketAnalysis {
    let payload = extract_json_payload(raw);
    serde_json::from_str(&payload).unwrap_or_else(|_| TicketAnalysis::fallback(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{EstimateUnit, TicketCategory};

    const VALID: &str = r#"{
        "category": "database",
        "summary": "Add an index on orders.created_at.",
        "dos": ["Measure query plans first"],
        "donts": ["Do not index every column"],
        "dependencies": [],
        "scenarios": ["Large table migration"],
        "risks": ["Lock contention during creation"],
        "outputs": ["Migration script"],
        "estimate": { "unit": "hours", "value": 3, "confidence": 0.8, "notes": "Straightforward" }
    }"#;

    #[test]
    fn parses_valid_payload() {
        let analysis = parse_analysis(VALID);
        assert_eq!(analysis.category, TicketCategory::Database);
        assert_eq!(analysis.estimate.value, 3.0);
        assert_eq!(analysis.dos, vec!["Measure query plans first"]);
    }

    #[test]
    fn parses_fenced_payload() {
        let fenced = format!("```json\n{}\n```", VALID);
        let analysis = parse_analysis(&fenced);
        assert_eq!(analysis.category, TicketCategory::Database);
    }

    #[test]
    fn non_json_falls_back_to_fixed_record() {
        let raw = "I think this is a backend task that will take a while.";
        let analysis = parse_analysis(raw);
        assert_eq!(analysis.category, TicketCategory::Other);
        assert_eq!(analysis.summary, raw);
        assert_eq!(analysis.estimate.unit, EstimateUnit::Hours);
        assert_eq!(analysis.estimate.value, 4.0);
        assert_eq!(analysis.estimate.confidence, 0.3);
        assert_eq!(
            analysis.estimate.notes.as_deref(),
            Some("Fallback (model returned non-JSON)")
        );
        assert!(analysis.dos.is_empty());
        assert!(analysis.outputs.is_empty());
    }

    #[test]
    fn json_missing_estimate_falls_back() {
        let raw = r#"{ "category": "backend", "summary": "No estimate here." }"#;
        let analysis = parse_analysis(raw);
        assert_eq!(analysis.category, TicketCategory::Other);
        assert_eq!(analysis.estimate.value, 4.0);
    }

    #[test]
    fn fallback_summary_is_capped() {
        let raw = "x".repeat(2000);
        let analysis = parse_analysis(&raw);
        assert_eq!(analysis.summary.len(), 500);
    }
}
