//! LLM 类型定义

use serde::{Deserialize, Serialize};

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色：system, user, assistant
    pub role: String,
    /// 消息内容
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// 补全选项
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// 最大 token 数
    pub max_tokens: Option<u32>,
    /// 响应格式（如 "json_object"）
    pub response_format: Option<String>,
}

/// 一次补全的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// 生成的文本
    pub content: String,
    /// 完成原因
    pub finish_reason: Option<String>,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP request failed: {0}")]
    HttpError(#[source] reqwest::Error),

    /// API 返回错误
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 超时错误
    #[error("request timed out")]
    Timeout,

    /// 配置错误
    #[error("config error: {0}")]
    ConfigError(String),

    /// JSON 解析错误
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 上游没有返回任何补全内容
    #[error("upstream returned no completion")]
    EmptyCompletion,
}

impl LlmError {
    /// 写入请求日志时使用的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::HttpError(_) => "http",
            LlmError::Api { .. } => "api",
            LlmError::Timeout => "timeout",
            LlmError::ConfigError(_) => "config",
            LlmError::JsonError(_) => "json",
            LlmError::EmptyCompletion => "empty",
        }
    }

    /// 上游 HTTP 状态码（如有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::HttpError(e)
        }
    }
}
