//! 统一错误处理模块
//!
//! 定义服务端错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。
//! 响应体固定为 `{"error": string}`。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;

/// 返回给前端的通用服务端错误文案
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("config error: {0}")]
    Config(String),

    /// LLM 调用错误
    #[error("upstream error: {0}")]
    Llm(#[from] LlmError),

    /// 请求参数错误
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 不支持的 HTTP 方法
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// 内部错误
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP 状态码
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Config(_) | AppError::Llm(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 对外暴露的错误信息，上游与配置细节只写日志
    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::MethodNotAllowed => self.to_string(),
            AppError::Config(_) | AppError::Llm(_) | AppError::Internal(_) => {
                GENERIC_SERVER_ERROR.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status(), body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
