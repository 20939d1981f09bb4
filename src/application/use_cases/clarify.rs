use crate::application::use_cases::prompts;
use crate::domain::chat::ChatMessage;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::ticket::TicketAnalysis;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use std::sync::Arc;

pub struct ClarifyUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ClarifyUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Answers a follow-up question about a previously analyzed ticket.
    /// Returns plain chat text, not a structured record.
    pub async fn execute(
        &self,
        config: &LLMConfig,
        prior_ticket: &str,
        prior_analysis: &TicketAnalysis,
        recent_messages: &[ChatMessage],
        question: &str,
    ) -> Result<String> {
        let system_prompt = prompts::build_clarification_system_prompt();
        let user_prompt = prompts::build_clarification_user_prompt(
            prior_ticket,
            prior_analysis,
            recent_messages,
            question,
        );

        let raw = self
            .llm_client
            .generate(config, &system_prompt, &user_prompt)
            .await?;

        Ok(clean_llm_response(&raw))
    }
}
