use std::sync::Arc;

use crate::application::{
    AnalyzeTicketUseCase, ChatService, ConversationStore, ExtractTextUseCase,
};
use crate::infrastructure::config::Settings;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::interfaces::http::AppState;

pub fn build_state(settings: &Settings) -> Arc<AppState> {
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let store = Arc::new(ConversationStore::new());

    Arc::new(AppState {
        llm_config: settings.llm.clone(),
        chat_service: ChatService::new(llm_client.clone(), store.clone()),
        analyze_use_case: AnalyzeTicketUseCase::new(llm_client.clone()),
        extract_text_use_case: ExtractTextUseCase::new(llm_client),
        store,
    })
}
