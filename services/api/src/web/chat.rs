//! services/api/src/web/chat.rs
//!
//! The chat API: one user message in, one assistant reply out. All the work
//! happens in the gateway; this handler only shapes the request/response.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use admission_core::domain::Session;

use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat - ask the admission assistant a question
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's reply (or the degraded fallback)", body = ChatResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let message = req.message.trim();
    if message.is_empty() {
        return Json(ChatResponse {
            reply: "Please type a message".to_string(),
        });
    }

    let reply = state.gateway.ask(&session.id, message).await;
    Json(ChatResponse { reply })
}
