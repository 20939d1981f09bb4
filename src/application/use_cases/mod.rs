pub mod analyze_ticket;
pub mod chat_service;
pub mod clarify;
pub mod classify_turn;
pub mod conversation_store;
pub mod extract_text;
pub mod format;
mod prompts;
