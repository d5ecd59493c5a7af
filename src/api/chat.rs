//! 文书反馈端点

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ChatReply, ChatRequest};
use crate::state::AppState;

/// 处理反馈请求
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatReply>> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected feedback request body: {}", e);
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    info!(
        "Feedback requested: chars={}, has_prompt={}",
        request.message.chars().count(),
        request.prompt.is_some()
    );

    let reply = state
        .feedback
        .generate_feedback(&request)
        .await
        .map_err(|e| {
            error!("Feedback generation failed: {}", e);
            AppError::Llm(e)
        })?;

    Ok(Json(ChatReply { reply }))
}

/// 非 POST 请求
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// 创建反馈路由
pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat", post(chat_handler).fallback(method_not_allowed))
}
