//! 文书反馈服务
//!
//! 封装 LlmClient，与配置系统集成。每个请求只调用一次上游，不重试、不缓存。

use std::sync::Arc;
use tracing::{info, warn};

use super::PromptService;
use crate::config::AppConfig;
use crate::llm::{ChatOptions, LlmClient, LlmError};
use crate::models::{ChatRequest, EssayFeedback};
use crate::utils::RequestLogger;

/// 反馈服务
pub struct FeedbackService {
    client: Option<LlmClient>,
    prompts: PromptService,
    model: String,
    temperature: f64,
    max_tokens: u32,
    json_mode: bool,
}

impl FeedbackService {
    /// 根据配置创建服务
    ///
    /// 没有 API Key 时 client 为空，之后每次调用都返回配置错误。
    pub fn new(config: &AppConfig, logger: Option<Arc<RequestLogger>>) -> Self {
        let client = if config.api_key.is_empty() {
            None
        } else {
            match LlmClient::new(&config.api_key, &config.base_url, config.timeout_secs) {
                Ok(client) => Some(match logger {
                    Some(logger) => client.with_logger(logger),
                    None => client,
                }),
                Err(e) => {
                    warn!("Failed to build LLM client: {}", e);
                    None
                }
            }
        };

        Self {
            client,
            prompts: PromptService::new(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            json_mode: config.json_mode,
        }
    }

    /// 是否已配置上游
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// 生成反馈，返回模型原文
    pub async fn generate_feedback(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let client = self.client.as_ref().ok_or_else(|| {
            LlmError::ConfigError("API Key not configured. Set OPENAI_API_KEY.".to_string())
        })?;

        let messages = self.prompts.build_feedback_messages(request);
        let options = ChatOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            response_format: self.json_mode.then(|| "json_object".to_string()),
        };

        let completion = client.complete(messages, &self.model, options).await?;

        if let Err(e) = EssayFeedback::parse(&completion.content) {
            warn!("Upstream reply is not a structured report: {}", e);
        }
        info!(
            "Feedback generated: chars={}, finish_reason={:?}",
            completion.content.chars().count(),
            completion.finish_reason
        );

        Ok(completion.content)
    }
}
