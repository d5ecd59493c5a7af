//! Anthropic Messages API 实现（非流式）

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::openai::truncate_body;
use super::types::{ChatMessage, ChatOptions, Completion, LlmError};

/// Anthropic 请求载荷
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic 响应
#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// 构建请求体：系统消息合并进顶层 system 字段
fn build_request<'a>(
    messages: &'a [ChatMessage],
    model: &'a str,
    options: &ChatOptions,
) -> AnthropicRequest<'a> {
    let system_parts: Vec<&str> = messages
        .iter()
        .filter(|m| m.is_system())
        .map(|m| m.content.as_str())
        .collect();

    let anthropic_messages = messages
        .iter()
        .filter(|m| !m.is_system())
        .map(|m| AnthropicMessage {
            role: &m.role,
            content: &m.content,
        })
        .collect();

    AnthropicRequest {
        model,
        messages: anthropic_messages,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        stream: false,
        max_tokens: options.max_tokens.unwrap_or(1500),
        temperature: options.temperature,
    }
}

/// 调用 Anthropic API
pub async fn complete_anthropic(
    client: &Client,
    api_key: &str,
    endpoint: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<Completion, LlmError> {
    let payload = build_request(messages, model, options);

    debug!("Anthropic API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(endpoint)
        .header("x-api-key", api_key)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("anthropic-version", "2023-06-01")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        error!(
            "Anthropic API error: status={}, body={}",
            status_code,
            truncate_body(&error_text)
        );
        return Err(LlmError::Api {
            status: status_code,
            message: error_text,
        });
    }

    let body = response.text().await?;
    parse_anthropic_response(&body)
}

fn parse_anthropic_response(body: &str) -> Result<Completion, LlmError> {
    let parsed: AnthropicResponse = serde_json::from_str(body)?;
    let content: String = parsed
        .content
        .into_iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text)
        .collect();

    if content.is_empty() {
        return Err(LlmError::EmptyCompletion);
    }

    Ok(Completion {
        content,
        finish_reason: parsed.stop_reason,
    })
}
