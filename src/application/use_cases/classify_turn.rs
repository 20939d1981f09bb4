use crate::application::use_cases::prompts;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnLabel {
    NewTicket,
    Clarification,
}

impl TurnLabel {
    /// Robustness rule: the model is asked for a one-word label, but anything
    /// containing "clarification" counts; everything else is a new ticket.
    pub fn from_response(raw: &str) -> Self {
        if raw.to_lowercase().contains("clarification") {
            TurnLabel::Clarification
        } else {
            TurnLabel::NewTicket
        }
    }
}

pub struct ClassifyTurnUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ClassifyTurnUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        prior_ticket: &str,
        message: &str,
    ) -> Result<TurnLabel> {
        let system_prompt = prompts::build_classification_system_prompt();
        let user_prompt = prompts::build_classification_user_prompt(prior_ticket, message);

        let raw = self
            .llm_client
            .generate(config, &system_prompt, &user_prompt)
            .await?;

        Ok(TurnLabel::from_response(&raw))
    }
}
