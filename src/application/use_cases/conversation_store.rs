use crate::domain::chat::{ChatMessage, Conversation, MessageRole};
use crate::domain::error::{AppError, Result};
use crate::domain::ticket::TicketAnalysis;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Number of trailing transcript entries carried into clarification prompts.
const MAX_CONTEXT_MESSAGES: usize = 6;

/// Context handed to the model for a follow-up turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub last_ticket: String,
    pub last_analysis: TicketAnalysis,
    pub recent_messages: Vec<ChatMessage>,
}

#[derive(Debug)]
struct ConversationState {
    messages: Vec<ChatMessage>,
    busy: bool,
    last_ticket: Option<String>,
    last_analysis: Option<TicketAnalysis>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationState {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            busy: false,
            last_ticket: None,
            last_analysis: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn summary(&self, id: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            message_count: self.messages.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// In-memory transcript store. Records live only for the lifetime of the
/// process; there is no persistence layer. The lock is held for state
/// transitions only, never across a model call.
pub struct ConversationStore {
    inner: Mutex<HashMap<String, ConversationState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self) -> Conversation {
        let id = Uuid::new_v4().to_string();
        let state = ConversationState::new();
        let summary = state.summary(&id);
        self.inner.lock().unwrap().insert(id, state);
        summary
    }

    /// Most recently updated first.
    pub fn list(&self) -> Vec<Conversation> {
        let inner = self.inner.lock().unwrap();
        let mut conversations: Vec<Conversation> = inner
            .iter()
            .map(|(id, state)| state.summary(id))
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        conversations
    }

    pub fn messages(&self, id: &str) -> Result<Vec<ChatMessage>> {
        let inner = self.inner.lock().unwrap();
        let state = inner
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?;
        Ok(state.messages.clone())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
    }

    /// Claims the conversation for one in-flight model exchange. A second
    /// claim before `finish_turn` is rejected; there is no queueing.
    pub fn begin_turn(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?;
        if state.busy {
            return Err(AppError::Busy(
                "A request is already in flight for this conversation.".to_string(),
            ));
        }
        state.busy = true;
        Ok(())
    }

    pub fn finish_turn(&self, id: &str) {
        if let Some(state) = self.inner.lock().unwrap().get_mut(id) {
            state.busy = false;
        }
    }

    pub fn is_busy(&self, id: &str) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        inner
            .get(id)
            .map(|state| state.busy)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
    }

    pub fn push_message(&self, id: &str, role: MessageRole, text: &str) -> Result<ChatMessage> {
        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?;
        let message = ChatMessage::new(role, text);
        state.messages.push(message.clone());
        state.updated_at = message.created_at;
        Ok(message)
    }

    /// Context for classifying/answering a follow-up, or `None` when the
    /// conversation has no analyzed ticket yet.
    pub fn turn_context(&self, id: &str) -> Result<Option<TurnContext>> {
        let inner = self.inner.lock().unwrap();
        let state = inner
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?;

        let (Some(last_ticket), Some(last_analysis)) =
            (state.last_ticket.as_ref(), state.last_analysis.as_ref())
        else {
            return Ok(None);
        };

        let start = state.messages.len().saturating_sub(MAX_CONTEXT_MESSAGES);
        Ok(Some(TurnContext {
            last_ticket: last_ticket.clone(),
            last_analysis: last_analysis.clone(),
            recent_messages: state.messages[start..].to_vec(),
        }))
    }

    pub fn record_analysis(&self, id: &str, ticket_text: &str, analysis: &TicketAnalysis) {
        if let Some(state) = self.inner.lock().unwrap().get_mut(id) {
            state.last_ticket = Some(ticket_text.to_string());
            state.last_analysis = Some(analysis.clone());
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_list_and_delete() {
        let store = ConversationStore::new();
        let a = store.create();
        let b = store.create();
        assert_eq!(store.list().len(), 2);

        store.push_message(&a.id, MessageRole::User, "hello").unwrap();
        // a was updated last, so it lists first
        assert_eq!(store.list()[0].id, a.id);

        store.delete(&b.id).unwrap();
        assert_eq!(store.list().len(), 1);
        assert!(matches!(
            store.delete(&b.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn unknown_conversation_is_not_found() {
        let store = ConversationStore::new();
        assert!(matches!(store.messages("nope"), Err(AppError::NotFound(_))));
        assert!(matches!(
            store.begin_turn("nope"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn busy_flag_gates_a_second_turn() {
        let store = ConversationStore::new();
        let conversation = store.create();

        store.begin_turn(&conversation.id).unwrap();
        assert!(matches!(
            store.begin_turn(&conversation.id),
            Err(AppError::Busy(_))
        ));

        store.finish_turn(&conversation.id);
        assert!(!store.is_busy(&conversation.id).unwrap());
        store.begin_turn(&conversation.id).unwrap();
    }

    #[test]
    fn turn_context_requires_a_prior_analysis() {
        let store = ConversationStore::new();
        let conversation = store.create();
        assert!(store.turn_context(&conversation.id).unwrap().is_none());

        let analysis = TicketAnalysis::fallback("raw");
        store.record_analysis(&conversation.id, "fix the build", &analysis);
        let context = store.turn_context(&conversation.id).unwrap().unwrap();
        assert_eq!(context.last_ticket, "fix the build");
        assert_eq!(context.last_analysis, analysis);
    }

    #[test]
    fn turn_context_caps_recent_messages() {
        let store = ConversationStore::new();
        let conversation = store.create();
        store.record_analysis(&conversation.id, "t", &TicketAnalysis::fallback("r"));
        for i in 0..10 {
            store
                .push_message(&conversation.id, MessageRole::User, &format!("m{}", i))
                .unwrap();
        }
        let context = store.turn_context(&conversation.id).unwrap().unwrap();
        assert_eq!(context.recent_messages.len(), MAX_CONTEXT_MESSAGES);
        assert_eq!(context.recent_messages.last().unwrap().text, "m9");
    }
}
