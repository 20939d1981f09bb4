use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Service settings: defaults, overlaid by `ticketsense.toml`, overlaid by
/// `TICKETSENSE_*` environment variables (nested keys split on `__`, e.g.
/// `TICKETSENSE_LLM__MODEL`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub llm: LLMConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            llm: LLMConfig::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let mut settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("ticketsense.toml"))
            .merge(Env::prefixed("TICKETSENSE_").split("__"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Invalid configuration: {}", e)))?;

        // Conventional fallback so a bare `GEMINI_API_KEY` in .env works
        if settings.llm.api_key.is_none() {
            settings.llm.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    #[test]
    fn defaults_match_original_generation_config() {
        let settings = Settings::default();
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.llm.provider, LLMProvider::Gemini);
        assert_eq!(settings.llm.model, "gemini-1.5-flash");
        assert_eq!(settings.llm.temperature, Some(0.3));
        assert_eq!(settings.llm.top_p, Some(0.9));
        assert_eq!(settings.llm.max_output_tokens, Some(2048));
    }
}
