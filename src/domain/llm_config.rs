use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LLMProvider {
    Gemini,
    OpenAI,
}

/// Connection and generation parameters for the hosted model API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            max_output_tokens: Some(2048),
            temperature: Some(0.3),
            top_p: Some(0.9),
        }
    }
}
