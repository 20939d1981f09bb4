pub mod use_cases;

pub use use_cases::analyze_ticket::AnalyzeTicketUseCase;
pub use use_cases::chat_service::ChatService;
pub use use_cases::conversation_store::ConversationStore;
pub use use_cases::extract_text::ExtractTextUseCase;
