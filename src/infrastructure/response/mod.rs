use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static INTERNAL_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<internal>[\s\S]*?</internal>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans a free-text model response by removing common artifacts and
/// unwanted tags. Used for clarification answers and image transcriptions,
/// never for JSON payloads.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = INTERNAL_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Collapse runs of blank lines into at most one
    cleaned = MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string();

    cleaned
}

/// Strips a Markdown code fence from a JSON-mode response. Models ignore the
/// "no code fences" instruction often enough that parsing the raw text
/// directly would trip the fallback for perfectly good payloads.
pub fn extract_json_payload(output: &str) -> String {
    let trimmed = output.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think/>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning>Final answer";
        assert_eq!(clean_llm_response(input), "Final answer");
    }

    #[test]
    fn test_clean_internal_tags() {
        let input = "<internal>Debug info</internal>Output";
        assert_eq!(clean_llm_response(input), "Output");
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "This is a normal response without any special tags.";
        assert_eq!(
            clean_llm_response(input),
            "This is a normal response without any special tags."
        );
    }

    #[test]
    fn test_extract_plain_json() {
        let input = r#"{"category":"backend"}"#;
        assert_eq!(extract_json_payload(input), input);
    }

    #[test]
    fn test_extract_json_fence() {
        let input = "```json\n{\"category\":\"backend\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"category\":\"backend\"}");
    }

    #[test]
    fn test_extract_bare_fence() {
        let input = "```\n{\"a\":1}\n```";
        assert_eq!(extract_json_payload(input), "{\"a\":1}");
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let input = "  \n {\"a\":1} \n ";
        assert_eq!(extract_json_payload(input), "{\"a\":1}");
    }
}
