use crate::domain::ticket::TicketAnalysis;

/// Renders an analysis into the chat text shown to the user.
pub fn format_analysis(analysis: &TicketAnalysis) -> String {
    let estimate = format!(
        "{} {} (confidence {:.0}%)",
        analysis.estimate.value,
        analysis.estimate.unit,
        analysis.estimate.confidence * 100.0
    );

    let mut sections = vec![
        format!("Category: {}", analysis.category.to_string().to_uppercase()),
        format!("Estimate: {}", estimate),
        String::new(),
        format!("Summary:\n{}", analysis.summary),
        String::new(),
        format!("Do's:\n{}", bullet_list(&analysis.dos)),
        String::new(),
        format!("Don'ts:\n{}", bullet_list(&analysis.donts)),
        String::new(),
        format!("Dependencies:\n{}", bullet_list(&analysis.dependencies)),
        String::new(),
        format!("Scenarios to cover:\n{}", bullet_list(&analysis.scenarios)),
        String::new(),
        format!("Risks:\n{}", bullet_list(&analysis.risks)),
        String::new(),
        format!("Deliverables:\n{}", bullet_list(&analysis.outputs)),
    ];

    if let Some(breakdown) = analysis.breakdown.as_ref().filter(|b| !b.is_empty()) {
        let lines: Vec<String> = breakdown
            .iter()
            .map(|step| format!("• {}: {} {}", step.step, step.value, step.unit))
            .collect();
        sections.push(String::new());
        sections.push(format!("Estimate breakdown:\n{}", lines.join("\n")));
    }

    sections.join("\n")
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "• —".to_string();
    }
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{
        BreakdownStep, EstimateUnit, TicketCategory, TicketEstimate,
    };

    fn analysis() -> TicketAnalysis {
        TicketAnalysis {
            category: TicketCategory::Frontend,
            summary: "Rework the signup form.".to_string(),
            dos: vec!["Validate inline".to_string(), "Label every field".to_string()],
            donts: vec!["Block paste in password fields".to_string()],
            dependencies: Vec::new(),
            scenarios: vec!["Empty submission".to_string()],
            risks: Vec::new(),
            outputs: vec!["Updated form component".to_string()],
            estimate: TicketEstimate {
                unit: EstimateUnit::Hours,
                value: 6.0,
                confidence: 0.75,
                notes: None,
            },
            breakdown: None,
        }
    }

    #[test]
    fn renders_category_and_estimate() {
        let text = format_analysis(&analysis());
        assert!(text.contains("Category: FRONTEND"));
        assert!(text.contains("Estimate: 6 hours (confidence 75%)"));
        assert!(text.contains("Summary:\nRework the signup form."));
    }

    #[test]
    fn every_non_empty_list_item_gets_a_bullet() {
        let a = analysis();
        let text = format_analysis(&a);
        for item in a
            .dos
            .iter()
            .chain(&a.donts)
            .chain(&a.scenarios)
            .chain(&a.outputs)
        {
            assert!(text.contains(&format!("• {}", item)), "missing: {}", item);
        }
    }

    #[test]
    fn empty_lists_render_a_dash_bullet() {
        let text = format_analysis(&analysis());
        assert!(text.contains("Dependencies:\n• —"));
        assert!(text.contains("Risks:\n• —"));
    }

    #[test]
    fn breakdown_section_appears_when_present() {
        let mut a = analysis();
        a.breakdown = Some(vec![
            BreakdownStep {
                step: "Markup".to_string(),
                unit: EstimateUnit::Hours,
                value: 2.0,
            },
            BreakdownStep {
                step: "Validation wiring".to_string(),
                unit: EstimateUnit::Hours,
                value: 4.0,
            },
        ]);
        let text = format_analysis(&a);
        assert!(text.contains("Estimate breakdown:"));
        assert!(text.contains("• Markup: 2 hours"));
        assert!(text.contains("• Validation wiring: 4 hours"));
    }

    #[test]
    fn no_breakdown_section_for_empty_breakdown() {
        let mut a = analysis();
        a.breakdown = Some(Vec::new());
        assert!(!format_analysis(&a).contains("Estimate breakdown:"));
    }
}
