use crate::application::{
    AnalyzeTicketUseCase, ChatService, ConversationStore, ExtractTextUseCase,
};
use crate::domain::error::AppError;
use crate::domain::llm_config::LLMConfig;
use crate::domain::ticket::TicketAnalysis;
use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct AppState {
    pub llm_config: LLMConfig,
    pub chat_service: ChatService,
    pub analyze_use_case: AnalyzeTicketUseCase,
    pub extract_text_use_case: ExtractTextUseCase,
    pub store: Arc<ConversationStore>,
}

#[derive(Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(length(min = 1, max = 4096))]
    pub text: String,
}

#[derive(Deserialize, Validate)]
pub struct ExtractTextRequest {
    pub mime_type: String,
    pub data: String,
    /// When set, a non-empty transcription is also appended to this
    /// conversation as an `extracted` entry.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: TicketAnalysis,
    pub rendered: String,
}

#[derive(Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
    pub found: bool,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Busy(_) => HttpResponse::Conflict().json(body),
        AppError::LLMError(_) => HttpResponse::BadGateway().json(body),
        AppError::ParseError(_) | AppError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn validation_response(err: &validator::ValidationErrors) -> HttpResponse {
    error_response(&AppError::ValidationError(err.to_string()))
}

#[post("/conversations")]
async fn create_conversation(data: web::Data<AppState>) -> impl Responder {
    let conversation = data.store.create();
    info!(conversation_id = %conversation.id, "Conversation created");
    HttpResponse::Created().json(conversation)
}

#[get("/conversations")]
async fn list_conversations(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.store.list())
}

#[get("/conversations/{id}/messages")]
async fn get_messages(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.store.messages(&path) {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => error_response(&e),
    }
}

#[delete("/conversations/{id}")]
async fn delete_conversation(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.store.delete(&path) {
        Ok(()) => {
            info!(conversation_id = %path.as_str(), "Conversation deleted");
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

#[post("/conversations/{id}/messages")]
async fn send_message(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<MessageRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    info!(conversation_id = %path.as_str(), "Chat message received");
    match data
        .chat_service
        .send_message(&data.llm_config, &path, &req.text)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

#[post("/analyze")]
async fn analyze(data: web::Data<AppState>, req: web::Json<MessageRequest>) -> impl Responder {
    if let Err(e) = req.validate() {
        return validation_response(&e);
    }

    info!("One-shot analysis requested");
    match data
        .analyze_use_case
        .execute(&data.llm_config, &req.text)
        .await
    {
        Ok(analysis) => {
            let rendered = crate::application::use_cases::format::format_analysis(&analysis);
            HttpResponse::Ok().json(AnalyzeResponse { analysis, rendered })
        }
        Err(e) => error_response(&e),
    }
}

#[post("/extract-text")]
async fn extract_text(
    data: web::Data<AppState>,
    req: web::Json<ExtractTextRequest>,
) -> impl Responder {
    info!(mime_type = %req.mime_type, "Image text extraction requested");
    match data
        .extract_text_use_case
        .execute(&data.llm_config, &req.mime_type, &req.data)
        .await
    {
        Ok(text) => {
            let found = !text.trim().is_empty();
            if found {
                if let Some(conversation_id) = req.conversation_id.as_deref() {
                    if let Err(e) = data.chat_service.push_extracted(conversation_id, &text) {
                        return error_response(&e);
                    }
                }
            }
            HttpResponse::Ok().json(ExtractTextResponse { text, found })
        }
        Err(e) => error_response(&e),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn start_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local tool, UI origin varies

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api")
                .service(create_conversation)
                .service(list_conversations)
                .service(get_messages)
                .service(delete_conversation)
                .service(send_message)
                .service(analyze)
                .service(extract_text)
                .service(health),
        )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
