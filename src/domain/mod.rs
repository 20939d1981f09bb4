pub mod chat;
pub mod error;
pub mod llm_config;
pub mod ticket;
