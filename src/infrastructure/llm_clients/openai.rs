use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAIClient {
    client: reqwest::Client,
}

impl OpenAIClient {
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
            .ok_or_else(|| AppError::LLMError("Missing API key for OpenAI provider".to_string()))
    }

    fn completions_url(config: &LLMConfig) -> String {
        let base_url = config.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base_url)
    }

    async fn chat(&self, config: &LLMConfig, messages: Value, json_mode: bool) -> Result<String> {
        let api_key = Self::api_key(config)?;

        let mut body = json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_output_tokens,
            "temperature": config.temperature,
            "top_p": config.top_p,
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(Self::completions_url(config))
            .bearer_auth(api_key)
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

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))
    }

    fn text_messages(system: &str, user: &str) -> Value {
        json!([
            { "role": "system", "content": system },
            { "role": "user", "content": user }
        ])
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        self.chat(config, Self::text_messages(system, user), false)
            .await
    }

    async fn generate_json(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        self.chat(config, Self::text_messages(system, user), true)
            .await
    }

    async fn extract_image_text(
        &self,
        config: &LLMConfig,
        instruction: &str,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String> {
        let data_url = format!("data:{};base64,{}", mime_type, data_base64);
        let messages = json!([
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": instruction },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }
        ]);
        self.chat(config, messages, false).await
    }
}
