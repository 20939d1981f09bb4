use crate::application::use_cases::analyze_ticket::AnalyzeTicketUseCase;
use crate::application::use_cases::clarify::ClarifyUseCase;
use crate::application::use_cases::classify_turn::{ClassifyTurnUseCase, TurnLabel};
use crate::application::use_cases::conversation_store::{ConversationStore, TurnContext};
use crate::application::use_cases::format::format_analysis;
use crate::domain::chat::{ChatMessage, MessageRole};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::ticket::TicketAnalysis;
use crate::infrastructure::llm_clients::LLMClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Single user-facing line for any failed model exchange. Causes are not
/// distinguished here; the typed error goes to the log.
pub const GENERIC_ERROR_REPLY: &str = "Sorry, I could not analyze that. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    Analysis,
    Clarification,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    pub analysis: Option<TicketAnalysis>,
    pub kind: TurnKind,
}

/// Orchestrates one chat turn: validate, claim the conversation, classify
/// the turn, run the analysis or clarification call, and always leave a
/// single bot entry and a cleared busy flag behind.
pub struct ChatService {
    store: Arc<ConversationStore>,
    analyze: AnalyzeTicketUseCase,
    classify: ClassifyTurnUseCase,
    clarify: ClarifyUseCase,
}

impl ChatService {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, store: Arc<ConversationStore>) -> Self {
        Self {
            store,
            analyze: AnalyzeTicketUseCase::new(llm_client.clone()),
            classify: ClassifyTurnUseCase::new(llm_client.clone()),
            clarify: ClarifyUseCase::new(llm_client),
        }
    }

    pub async fn send_message(
        &self,
        config: &LLMConfig,
        conversation_id: &str,
        text: &str,
    ) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            // No transcript entry and no model call for blank input
            return Err(AppError::ValidationError(
                "Message text is empty.".to_string(),
            ));
        }

        self.store.begin_turn(conversation_id)?;
        let result = self.execute_turn(config, conversation_id, text).await;
        self.store.finish_turn(conversation_id);
        result
    }

    async fn execute_turn(
        &self,
        config: &LLMConfig,
        conversation_id: &str,
        text: &str,
    ) -> Result<TurnOutcome> {
        let user_message = self
            .store
            .push_message(conversation_id, MessageRole::User, text)?;
        let context = self.store.turn_context(conversation_id)?;

        match self.run_model_turn(config, text, context.as_ref()).await {
            Ok((reply_text, analysis, kind)) => {
                if let Some(analysis) = &analysis {
                    self.store.record_analysis(conversation_id, text, analysis);
                }
                let reply = self
                    .store
                    .push_message(conversation_id, MessageRole::Bot, &reply_text)?;
                Ok(TurnOutcome {
                    user_message,
                    reply,
                    analysis,
                    kind,
                })
            }
            Err(err) => {
                error!(conversation_id, error = %err, "Model exchange failed");
                let reply =
                    self.store
                        .push_message(conversation_id, MessageRole::Bot, GENERIC_ERROR_REPLY)?;
                Ok(TurnOutcome {
                    user_message,
                    reply,
                    analysis: None,
                    kind: TurnKind::Failed,
                })
            }
        }
    }

    async fn run_model_turn(
        &self,
        config: &LLMConfig,
        text: &str,
        context: Option<&TurnContext>,
    ) -> Result<(String, Option<TicketAnalysis>, TurnKind)> {
        // The first message of a conversation is always a new ticket; a
        // failed classification call also falls through to a fresh analysis.
        let label = match context {
            Some(ctx) => self
                .classify
                .execute(config, &ctx.last_ticket, text)
                .await
                .unwrap_or(TurnLabel::NewTicket),
            None => TurnLabel::NewTicket,
        };

        match (label, context) {
            (TurnLabel::Clarification, Some(ctx)) => {
                let answer = self
                    .clarify
                    .execute(
                        config,
                        &ctx.last_ticket,
                        &ctx.last_analysis,
                        &ctx.recent_messages,
                        text,
                    )
                    .await?;
                Ok((answer, None, TurnKind::Clarification))
            }
            _ => {
                let analysis = self.analyze.execute(config, text).await?;
                let rendered = format_analysis(&analysis);
                Ok((rendered, Some(analysis), TurnKind::Analysis))
            }
        }
    }

    /// Extracted chat message for an image transcription, appended so the
    /// user sees what was read before submitting it as a ticket.
    pub fn push_extracted(&self, conversation_id: &str, text: &str) -> Result<ChatMessage> {
        self.store
            .push_message(conversation_id, MessageRole::Extracted, text)
    }
}
