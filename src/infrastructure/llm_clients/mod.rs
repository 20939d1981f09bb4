pub mod gemini;
pub mod openai;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::llm_config::LLMProvider;
use async_trait::async_trait;
use gemini::GeminiClient;
use openai::OpenAIClient;

#[async_trait]
pub trait LLMClient {
    /// Plain text generation.
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String>;

    /// Generation with the provider's JSON output mode enabled. The returned
    /// string is still raw model text; callers parse it themselves.
    async fn generate_json(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String>;

    /// Vision call: `data_base64` is the base64-encoded image body.
    async fn extract_image_text(
        &self,
        config: &LLMConfig,
        instruction: &str,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String>;
}

pub struct RouterClient {
    gemini: GeminiClient,
    openai: OpenAIClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            gemini: GeminiClient::new(),
            openai: OpenAIClient::new(),
        }
    }
}

impl Default for RouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        match config.provider {
            LLMProvider::Gemini => self.gemini.generate(config, system, user).await,
            LLMProvider::OpenAI => self.openai.generate(config, system, user).await,
        }
    }

    async fn generate_json(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        match config.provider {
            LLMProvider::Gemini => self.gemini.generate_json(config, system, user).await,
            LLMProvider::OpenAI => self.openai.generate_json(config, system, user).await,
        }
    }

    async fn extract_image_text(
        &self,
        config: &LLMConfig,
        instruction: &str,
        mime_type: &str,
        data_base64: &str,
    ) -> Result<String> {
        match config.provider {
            LLMProvider::Gemini => {
                self.gemini
                    .extract_image_text(config, instruction, mime_type, data_base64)
                    .await
            }
            LLMProvider::OpenAI => {
                self.openai
                    .extract_image_text(config, instruction, mime_type, data_base64)
                    .await
            }
        }
    }
}
