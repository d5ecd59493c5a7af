//! 提交文书到反馈服务
//!
//! 每次提交最多一个 POST，失败即终止，不自动重试。

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::feedback::Feedback;
use crate::models::ChatRequest;

/// 文书最少字符数
pub const MIN_ESSAY_CHARS: usize = 100;

/// 服务端错误的兜底文案
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// 网络失败时的文案
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Could not connect to the AI service. Check your internet connection or OpenAI key";

/// 提交失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// 本地校验失败，没有发出请求
    #[error("{0}")]
    Validation(String),

    /// 服务端返回错误状态或 error 字段
    #[error("{0}")]
    Server(String),

    /// 请求本身失败（DNS、超时、离线）
    #[error("{0}")]
    Connectivity(String),
}

impl SubmitError {
    /// 给用户看的文案
    pub fn message(&self) -> &str {
        match self {
            SubmitError::Validation(msg) | SubmitError::Server(msg) | SubmitError::Connectivity(msg) => msg,
        }
    }
}

/// 本地校验
pub fn validate_essay(essay: &str) -> Result<(), SubmitError> {
    if essay.trim().is_empty() {
        return Err(SubmitError::Validation("Paste your essay text".to_string()));
    }
    if essay.chars().count() < MIN_ESSAY_CHARS {
        return Err(SubmitError::Validation(format!(
            "Write at least {} characters for meaningful feedback",
            MIN_ESSAY_CHARS
        )));
    }
    Ok(())
}

/// 服务端响应体，两种形状共用
#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// 反馈服务客户端
#[derive(Clone)]
pub struct FeedbackClient {
    http: Client,
    endpoint: String,
}

impl FeedbackClient {
    /// 指向 `{base_url}/api/chat`
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// 使用已有的 HTTP 客户端
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 提交文书并取回反馈
    pub async fn submit_essay(&self, request: &ChatRequest) -> Result<Feedback, SubmitError> {
        validate_essay(&request.message)?;

        info!("Submitting essay: chars={}", request.message.chars().count());

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Feedback request failed: {}", e);
                SubmitError::Connectivity(CONNECTIVITY_ERROR_MESSAGE.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!("Failed to read feedback response: {}", e);
            SubmitError::Connectivity(CONNECTIVITY_ERROR_MESSAGE.to_string())
        })?;

        let body: ReplyBody = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                warn!("Undecodable feedback response (status {}): {}", status, e);
                ReplyBody::default()
            }
        };

        let server_error = body.error.filter(|e| !e.is_empty());
        if !status.is_success() || server_error.is_some() {
            warn!("Feedback service error: status={}", status);
            return Err(SubmitError::Server(
                server_error.unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string()),
            ));
        }

        body.reply
            .map(Feedback::from_reply)
            .ok_or_else(|| SubmitError::Server(SERVER_ERROR_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port_url, sample_feedback_json, StubServer};
    use axum::http::Method;
    use serde_json::json;

    fn essay_of(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            validate_essay("   "),
            Err(SubmitError::Validation("Paste your essay text".to_string()))
        );
        let err = validate_essay(&essay_of(99)).unwrap_err();
        assert_eq!(err.message(), "Write at least 100 characters for meaningful feedback");
        assert!(validate_essay(&essay_of(100)).is_ok());
        // 按字符而不是字节计数
        assert!(validate_essay(&"я".repeat(99)).is_err());
        assert!(validate_essay(&"я".repeat(100)).is_ok());
    }

    #[tokio::test]
    async fn test_short_essays_never_reach_the_network() {
        let server = StubServer::chat_reply("unused").await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();

        for len in [0, 1, 50, 99] {
            let err = client
                .submit_essay(&ChatRequest::new(essay_of(len)))
                .await
                .unwrap_err();
            assert!(matches!(err, SubmitError::Validation(_)));
        }
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_exactly_one_post_with_message_field() {
        let server = StubServer::chat_reply(&sample_feedback_json(90)).await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();
        let essay = essay_of(150);

        let feedback = client.submit_essay(&ChatRequest::new(essay.clone())).await.unwrap();

        assert_eq!(server.hits(), 1);
        assert_eq!(server.last_method(), Some(Method::POST));
        assert_eq!(server.last_request().unwrap()["message"], essay);
        assert_eq!(feedback.readiness_score(), Some(90));
    }

    #[tokio::test]
    async fn test_error_status_uses_body_message() {
        let server = StubServer::chat_json(500, json!({ "error": "Server error" })).await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();

        let err = client.submit_essay(&ChatRequest::new(essay_of(120))).await.unwrap_err();
        assert_eq!(err, SubmitError::Server("Server error".to_string()));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_error_field_in_ok_body() {
        let server = StubServer::chat_json(200, json!({ "error": "quota exhausted" })).await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();

        let err = client.submit_essay(&ChatRequest::new(essay_of(120))).await.unwrap_err();
        assert_eq!(err, SubmitError::Server("quota exhausted".to_string()));
    }

    #[tokio::test]
    async fn test_non_json_error_uses_fallback() {
        let server = StubServer::chat_text(405, "Method Not Allowed").await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();

        let err = client.submit_essay(&ChatRequest::new(essay_of(120))).await.unwrap_err();
        assert_eq!(err, SubmitError::Server(SERVER_ERROR_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_ok_without_reply_is_server_error() {
        let server = StubServer::chat_json(200, json!({})).await;
        let client = FeedbackClient::new(&server.base_url()).unwrap();

        let err = client.submit_essay(&ChatRequest::new(essay_of(120))).await.unwrap_err();
        assert!(matches!(err, SubmitError::Server(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_distinct() {
        let client = FeedbackClient::new(&closed_port_url().await).unwrap();

        let err = client.submit_essay(&ChatRequest::new(essay_of(120))).await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::Connectivity(CONNECTIVITY_ERROR_MESSAGE.to_string())
        );
        assert_ne!(err.message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_endpoint_join() {
        let client = FeedbackClient::with_client(Client::new(), "http://localhost:8765/");
        assert_eq!(client.endpoint(), "http://localhost:8765/api/chat");
    }
}
