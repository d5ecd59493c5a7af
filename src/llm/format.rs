//! 上游接口格式
//!
//! 模型名含 "claude" 走 Anthropic Messages，其余都按 OpenAI 兼容的 Chat Completions 处理。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    OpenAi,
    Anthropic,
}

impl ApiFormat {
    pub fn for_model(model: &str) -> Self {
        if model.to_lowercase().contains("claude") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAi
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::OpenAi => "openai",
            ApiFormat::Anthropic => "anthropic",
        }
    }

    /// 版本号之后的资源路径
    fn resource(&self) -> &'static str {
        match self {
            ApiFormat::OpenAi => "chat/completions",
            ApiFormat::Anthropic => "messages",
        }
    }

    /// 在规范化后的 base_url 上拼出完整端点
    ///
    /// base_url 可以是主机、`.../v1` 或者已经是完整端点。
    pub fn endpoint(&self, base_url: &str) -> String {
        let resource = self.resource();
        if base_url.ends_with(&format!("/{resource}")) {
            base_url.to_string()
        } else if base_url.ends_with("/v1") {
            format!("{base_url}/{resource}")
        } else {
            format!("{base_url}/v1/{resource}")
        }
    }
}

/// 规范化配置里的 base_url：去掉首尾空白、末尾斜杠和路径中的空段
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, trimmed),
    };
    let path = rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    match scheme {
        Some(scheme) => format!("{scheme}://{path}"),
        None => path,
    }
}
