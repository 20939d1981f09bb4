use crate::application::use_cases::prompts::IMAGE_EXTRACTION_INSTRUCTION;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use base64::prelude::BASE64_STANDARD;
use base64::Engine as _;
use std::sync::Arc;

pub struct ExtractTextUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ExtractTextUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Transcribes the text content of an image via the model's vision
    /// input. Returns an empty string when the image holds no legible text.
    pub async fn execute(
        &self,
        config: &LLMConfig,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String> {
        let (mime_type, data) = normalize_payload(mime_type, data_base64)?;

        let raw = self
            .llm_client
            .extract_image_text(config, IMAGE_EXTRACTION_INSTRUCTION, &mime_type, &data)
            .await?;

        Ok(clean_llm_response(&raw))
    }
}

/// Accepts either a bare base64 body with an explicit mime type, or a full
/// `data:` URL (the mime type embedded in the URL wins). Rejects
/// non-image mime types and payloads that do not decode as base64.
fn normalize_payload(mime_type: &str, data: &str) -> Result<(String, String)> {
    let (mime_type, body) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest.split_once(',').ok_or_else(|| {
                AppError::ValidationError("Malformed data URL in image payload.".to_string())
            })?;
            let embedded_mime = header.trim_end_matches(";base64");
            (embedded_mime.to_string(), body.to_string())
        }
        None => (mime_type.trim().to_string(), data.to_string()),
    };

    if !mime_type.starts_with("image/") {
        return Err(AppError::ValidationError(format!(
            "Unsupported mime type for text extraction: {}",
            mime_type
        )));
    }

    let body = body.trim().to_string();
    BASE64_STANDARD
        .decode(&body)
        .map_err(|_| AppError::ValidationError("Image payload is not valid base64.".to_string()))?;

    Ok((mime_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    // "hi" in base64
    const BODY: &str = "aGk=";

    #[test]
    fn accepts_bare_base64_with_mime() {
        let (mime, data) = normalize_payload("image/png", BODY).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, BODY);
    }

    #[test]
    fn accepts_data_url_and_prefers_embedded_mime() {
        let url = format!("data:image/jpeg;base64,{}", BODY);
        let (mime, data) = normalize_payload("image/png", &url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(data, BODY);
    }

    #[test]
    fn rejects_non_image_mime() {
        let err = normalize_payload("application/pdf", BODY).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = normalize_payload("image/png", "not base64!!").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_malformed_data_url() {
        let err = normalize_payload("image/png", "data:image/png;base64").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
