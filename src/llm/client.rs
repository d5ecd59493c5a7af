//! 统一 LLM 客户端

use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use super::anthropic::complete_anthropic;
use super::format::{normalize_base_url, ApiFormat};
use super::openai::complete_openai;
use super::types::{ChatMessage, ChatOptions, Completion, LlmError};
use crate::utils::{RequestInfo, RequestLogger};

/// 统一 LLM 客户端
///
/// 支持 OpenAI 和 Anthropic API 格式，根据模型名称自动选择。每次调用只发一个请求，不重试。
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    logger: Option<Arc<RequestLogger>>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        // 构建 HTTP 客户端
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: normalize_base_url(&base_url.into()),
            timeout_secs,
            logger: None,
        })
    }

    /// 附加请求日志记录器
    pub fn with_logger(mut self, logger: Arc<RequestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// 单次补全（自动检测 API 格式）
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<Completion, LlmError> {
        let api_format = ApiFormat::for_model(model);
        let endpoint = api_format.endpoint(&self.base_url);
        info!("LLM request: model={}, api_format={:?}", model, api_format);

        let log_entry = self.logger.as_ref().map(|logger| {
            logger.log_request(&RequestInfo {
                api_format: api_format.as_str(),
                endpoint: &endpoint,
                model,
                api_key: &self.api_key,
                messages: &messages,
                temperature: options.temperature,
                max_tokens: options.max_tokens,
                timeout: self.timeout_secs,
            })
        });
        let start_time = Instant::now();

        let result = match api_format {
            ApiFormat::OpenAi => {
                complete_openai(&self.client, &self.api_key, &endpoint, &messages, model, &options)
                    .await
            }
            ApiFormat::Anthropic => {
                complete_anthropic(&self.client, &self.api_key, &endpoint, &messages, model, &options)
                    .await
            }
        };

        if let (Some(logger), Some(entry)) = (self.logger.as_ref(), log_entry) {
            match &result {
                Ok(completion) => logger.log_success(
                    entry,
                    start_time,
                    &completion.content,
                    completion.finish_reason.as_deref(),
                ),
                Err(e) => logger.log_error(entry, start_time, e.kind(), &e.to_string(), e.status_code()),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;
    use tempfile::TempDir;

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            LlmClient::new("", "https://api.openai.com", 120),
            Err(LlmError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_openai_completion_roundtrip() {
        let upstream = StubServer::openai_reply("Solid essay.").await;
        let dir = TempDir::new().unwrap();
        let logger = Arc::new(RequestLogger::new(Some(dir.path().to_path_buf())));
        let client = LlmClient::new("sk-test-key-123456", upstream.base_url(), 5)
            .unwrap()
            .with_logger(Arc::clone(&logger));

        let options = ChatOptions {
            temperature: Some(0.7),
            max_tokens: Some(1500),
            response_format: None,
        };
        let completion = client
            .complete(vec![ChatMessage::user("essay")], "gpt-4o-mini", options)
            .await
            .unwrap();

        assert_eq!(completion.content, "Solid essay.");
        assert_eq!(upstream.hits(), 1);

        let request = upstream.last_request().unwrap();
        assert_eq!(request["model"], "gpt-4o-mini");
        assert_eq!(request["temperature"], 0.7);
        assert_eq!(request["max_tokens"], 1500);
        assert_eq!(request["messages"][0]["content"], "essay");

        let log = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(log.contains("\"status\":\"success\""));
        assert!(!log.contains("sk-test-key-123456"));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let upstream = StubServer::openai_failure(429, "rate limited").await;
        let client = LlmClient::new("sk-test", upstream.base_url(), 5).unwrap();

        let err = client
            .complete(vec![ChatMessage::user("essay")], "gpt-4o-mini", ChatOptions::default())
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("rate limited"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn test_base_url_with_trailing_slash() {
        let upstream = StubServer::openai_reply("ok").await;
        let base_url = format!("{}//v1/", upstream.base_url());
        let client = LlmClient::new("sk-test", base_url, 5).unwrap();

        let completion = client
            .complete(vec![ChatMessage::user("essay")], "gpt-4o-mini", ChatOptions::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "ok");
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let upstream = StubServer::openai_stalled(Duration::from_secs(3)).await;
        let client = LlmClient::new("sk-test", upstream.base_url(), 1).unwrap();

        let err = client
            .complete(vec![ChatMessage::user("essay")], "gpt-4o-mini", ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout), "unexpected error: {err:?}");
        assert_eq!(err.kind(), "timeout");
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let base_url = crate::test_support::closed_port_url().await;
        let client = LlmClient::new("sk-test", base_url, 5).unwrap();

        let err = client
            .complete(vec![ChatMessage::user("essay")], "gpt-4o-mini", ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::HttpError(_)));
    }
}
