//! 应用配置管理
//!
//! 启动时加载一次：默认值 → 可执行文件同级的 config.json → 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    // 配置文件位于可执行文件同级目录
    exe_dir().join("config.json")
}

/// 可执行文件所在目录
pub(crate) fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API 密钥
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 最大输出 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 是否要求上游返回 JSON 对象
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,

    /// 上游请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求日志目录，缺省为可执行文件同级的 storage/
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_json_mode() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            json_mode: default_json_mode(),
            timeout_secs: default_timeout_secs(),
            host: default_host(),
            port: default_port(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// 加载配置：文件 + 进程环境变量
    pub fn load() -> Self {
        let mut config = load_config_from_file(&get_config_path()).unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok());

        if config.api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; feedback requests will fail");
        }
        info!(
            "Config loaded: base_url={}, model={}, max_tokens={}",
            config.base_url, config.model, config.max_tokens
        );
        config
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 返回给定键的值，测试中可以替换为内存表。
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.api_key = key.trim().to_string();
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("ESSAY_MENTOR_MODEL") {
            self.model = model;
        }
        if let Some(host) = lookup("ESSAY_MENTOR_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("ESSAY_MENTOR_PORT") {
            match port.parse() {
                Ok(p) => self.port = p,
                Err(e) => warn!("Invalid ESSAY_MENTOR_PORT value {:?}: {}", port, e),
            }
        }
        if let Some(dir) = lookup("ESSAY_MENTOR_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }

    /// 监听地址字符串
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 从文件加载配置
fn load_config_from_file(path: &Path) -> Option<AppConfig> {
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}
