use crate::domain::chat::{ChatMessage, MessageRole};
use crate::domain::ticket::TicketAnalysis;

pub(crate) fn build_analysis_system_prompt() -> String {
    r#"You are an expert software project analyst. Analyze the user's ticket/task text and
return a strict JSON object (no markdown, no code fences) with fields:

{
  "category": "frontend|backend|database|qa|devops|security|data|other",
  "summary": "one short paragraph",
  "dos": ["..."],
  "donts": ["..."],
  "dependencies": ["..."],
  "scenarios": ["..."],
  "risks": ["..."],
  "outputs": ["..."],
  "estimate": { "unit": "hours|days", "value": 1, "confidence": 0.0, "notes": "..." },
  "breakdown": [ { "step": "...", "unit": "hours|days", "value": 1 } ]
}

The breakdown is optional; when you include it, the step values should sum to the
top-level estimate value.

Classification hints:
- Frontend: UI, Angular/React, components, forms, CSS, accessibility, browser issues.
- Backend: APIs, services, business logic, auth, logging, performance.
- Database: schema, migrations, indexing, queries.
- QA: test plans, automation, regression, acceptance checks.
- DevOps: CI/CD, infra, env vars, observability, scaling.
- Security: authn/z, secrets, compliance, data protection.
- Data: ETL, analytics, reporting, exports.

Make the advice concrete and concise. Estimate conservatively for an average engineer."#
        .to_string()
}

pub(crate) fn build_analysis_user_prompt(ticket_text: &str) -> String {
    format!("User ticket:\n\"\"\"{}\"\"\"", ticket_text)
}

pub(crate) fn build_classification_system_prompt() -> String {
    "You are a triage assistant for a ticket-analysis chat. Decide whether the user's \
latest message is a brand new ticket to analyze, or a follow-up question about the \
previous ticket and its analysis. Answer with exactly one word: new_ticket or \
clarification. No other output."
        .to_string()
}

pub(crate) fn build_classification_user_prompt(prior_ticket: &str, message: &str) -> String {
    format!(
        "Previous ticket:\n\"\"\"{}\"\"\"\n\nLatest message:\n\"\"\"{}\"\"\"",
        prior_ticket, message
    )
}

pub(crate) fn build_clarification_system_prompt() -> String {
    "You are an expert software project analyst. The user is asking a follow-up \
question about a ticket you already analyzed. Answer the question directly and \
concisely in plain text, grounded in the prior analysis. Do not return JSON and do \
not restate the whole analysis."
        .to_string()
}

pub(crate) fn build_clarification_user_prompt(
    prior_ticket: &str,
    prior_analysis: &TicketAnalysis,
    recent_messages: &[ChatMessage],
    question: &str,
) -> String {
    let mut body = String::new();
    body.push_str(&format!("Original ticket:\n\"\"\"{}\"\"\"\n\n", prior_ticket));

    body.push_str("Prior analysis:\n");
    body.push_str(&format!("- Category: {}\n", prior_analysis.category));
    body.push_str(&format!(
        "- Estimate: {} {} (confidence {:.0}%)\n",
        prior_analysis.estimate.value,
        prior_analysis.estimate.unit,
        prior_analysis.estimate.confidence * 100.0
    ));
    body.push_str(&format!("- Summary: {}\n", prior_analysis.summary));
    if !prior_analysis.risks.is_empty() {
        body.push_str(&format!("- Risks: {}\n", prior_analysis.risks.join("; ")));
    }
    if !prior_analysis.dependencies.is_empty() {
        body.push_str(&format!(
            "- Dependencies: {}\n",
            prior_analysis.dependencies.join("; ")
        ));
    }

    if !recent_messages.is_empty() {
        body.push_str("\nRecent conversation:\n");
        for msg in recent_messages {
            let role_label = match msg.role {
                MessageRole::User => "User",
                MessageRole::Bot => "Assistant",
                MessageRole::Extracted => "Extracted",
            };
            body.push_str(&format!("{}: {}\n", role_label, msg.text));
        }
    }

    body.push_str(&format!("\nFollow-up question: {}\n", question));
    body
}

pub(crate) const IMAGE_EXTRACTION_INSTRUCTION: &str =
    "Transcribe all legible text from this image. Preserve line breaks. \
Return only the transcribed text, with no commentary. If there is no legible \
text, return an empty response.";
