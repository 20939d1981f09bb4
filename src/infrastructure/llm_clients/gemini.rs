use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Serialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::LLMError("Missing API key for Gemini provider".to_string()))
    }

    fn generation_config(config: &LLMConfig, response_mime_type: Option<&str>) -> GenerationConfig {
        GenerationConfig {
            temperature: config.temperature.unwrap_or(0.3) as f64,
            top_p: config.top_p.map(|value| value as f64),
            max_output_tokens: config.max_output_tokens,
            response_mime_type: response_mime_type.map(str::to_string),
        }
    }

    async fn generate_content(
        &self,
        config: &LLMConfig,
        parts: Vec<GeminiPart>,
        response_mime_type: Option<&str>,
    ) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let base_url = config.base_url.trim_end_matches('/');
        let model_id = config.model.trim();
        let url = format!("{}/{}:generateContent?key={}", base_url, model_id, api_key);

        let body = GeminiRequest {
            contents: vec![GeminiContent { parts, role: None }],
            generation_config: Some(Self::generation_config(config, response_mime_type)),
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        json.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))
    }

    fn text_parts(system: &str, user: &str) -> Vec<GeminiPart> {
        let mut parts = Vec::new();
        if !system.trim().is_empty() {
            parts.push(GeminiPart::Text {
                text: system.to_string(),
            });
        }
        if !user.trim().is_empty() {
            parts.push(GeminiPart::Text {
                text: user.to_string(),
            });
        }
        parts
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        self.generate_content(config, Self::text_parts(system, user), None)
            .await
    }

    async fn generate_json(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        self.generate_content(
            config,
            Self::text_parts(system, user),
            Some("application/json"),
        )
        .await
    }

    async fn extract_image_text(
        &self,
        config: &LLMConfig,
        instruction: &str,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String> {
        let parts = vec![
            GeminiPart::Text {
                text: instruction.to_string(),
            },
            GeminiPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: mime_type.to_string(),
                    data: data_base64.to_string(),
                },
            },
        ];
        self.generate_content(config, parts, None).await
    }
}
