use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum characters of raw model output carried into the fallback summary.
const FALLBACK_SUMMARY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Frontend,
    Backend,
    Database,
    Qa,
    Devops,
    Security,
    Data,
    #[default]
    Other,
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TicketCategory::Frontend => "frontend",
            TicketCategory::Backend => "backend",
            TicketCategory::Database => "database",
            TicketCategory::Qa => "qa",
            TicketCategory::Devops => "devops",
            TicketCategory::Security => "security",
            TicketCategory::Data => "data",
            TicketCategory::Other => "other",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateUnit {
    Hours,
    Days,
}

impl fmt::Display for EstimateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateUnit::Hours => write!(f, "hours"),
            EstimateUnit::Days => write!(f, "days"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketEstimate {
    pub unit: EstimateUnit,
    pub value: f64,
    /// 0.0 to 1.0.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One step of an optional effort breakdown. Step values are expected, but
/// not enforced, to sum to the top-level estimate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownStep {
    pub step: String,
    pub unit: EstimateUnit,
    pub value: f64,
}

/// Structured analysis of a single ticket, as produced by the model.
///
/// List fields the model omits deserialize to empty lists; a response that
/// fails to parse at all is replaced by [`TicketAnalysis::fallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    #[serde(default)]
    pub category: TicketCategory,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub dos: Vec<String>,
    #[serde(default)]
    pub donts: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub scenarios: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    pub estimate: TicketEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<BreakdownStep>>,
}

impl TicketAnalysis {
    /// Fixed substitute record for a response that is not valid JSON.
    /// Carries the head of the raw text as the summary so the user still
    /// sees what the model said.
    pub fn fallback(raw: &str) -> Self {
        Self {
            category: TicketCategory::Other,
            summary: raw.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
            dos: Vec::new(),
            donts: Vec::new(),
            dependencies: Vec::new(),
            scenarios: Vec::new(),
            risks: Vec::new(),
            outputs: Vec::new(),
            estimate: TicketEstimate {
                unit: EstimateUnit::Hours,
                value: 4.0,
                confidence: 0.3,
                notes: Some("Fallback (model returned non-JSON)".to_string()),
            },
            breakdown: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serde_is_lowercase() {
        let json = serde_json::to_string(&TicketCategory::Devops).unwrap();
        assert_eq!(json, "\"devops\"");
        let parsed: TicketCategory = serde_json::from_str("\"frontend\"").unwrap();
        assert_eq!(parsed, TicketCategory::Frontend);
    }

    #[test]
    fn fallback_truncates_at_char_boundary() {
        let raw = "é".repeat(600);
        let analysis = TicketAnalysis::fallback(&raw);
        assert_eq!(analysis.summary.chars().count(), 500);
        assert_eq!(analysis.category, TicketCategory::Other);
        assert_eq!(analysis.estimate.value, 4.0);
        assert_eq!(analysis.estimate.unit, EstimateUnit::Hours);
        assert!(analysis.dos.is_empty());
        assert!(analysis.breakdown.is_none());
    }

    #[test]
    fn missing_list_fields_default_to_empty() {
        let json = r#"{
            "category": "backend",
            "summary": "Add an endpoint.",
            "estimate": { "unit": "hours", "value": 6, "confidence": 0.7 }
        }"#;
        let analysis: TicketAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.category, TicketCategory::Backend);
        assert!(analysis.donts.is_empty());
        assert!(analysis.risks.is_empty());
        assert!(analysis.estimate.notes.is_none());
    }

    #[test]
    fn breakdown_round_trips() {
        let json = r#"{
            "category": "qa",
            "summary": "Regression suite.",
            "estimate": { "unit": "days", "value": 3, "confidence": 0.5 },
            "breakdown": [
                { "step": "Plan cases", "unit": "days", "value": 1 },
                { "step": "Automate", "unit": "days", "value": 2 }
            ]
        }"#;
        let analysis: TicketAnalysis = serde_json::from_str(json).unwrap();
        let breakdown = analysis.breakdown.as_ref().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].step, "Plan cases");
        assert_eq!(breakdown[1].value, 2.0);
    }
}
