//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

/// 反馈请求
///
/// 只有 `message`（文书正文）是必填的，其余字段帮助模型判断是否切题。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_category: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// 反馈响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
