//! 上游请求日志记录器
//!
//! 把每次补全调用追加到 JSONL 文件，便于排查上游问题。写日志失败不会影响请求本身。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::llm::ChatMessage;

/// 日志文件名
const LOG_FILE_NAME: &str = "llm_requests.jsonl";

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 ID
    pub request_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// API 格式
    pub api_format: String,
    /// 端点 URL
    pub endpoint: String,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    /// 模型名称
    pub model: String,
    /// 消息数量
    pub messages_count: usize,
    /// 消息预览
    pub messages_preview: Vec<MessagePreview>,
    /// 温度参数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// 最大 token 数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// 超时时间
    pub timeout: u64,
    /// 状态：pending / success / error
    pub status: String,
    /// 持续时间（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// 响应长度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    /// 完成原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// 响应预览
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    /// 错误类型
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// HTTP 状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 消息预览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreview {
    pub role: String,
    pub content_preview: String,
}

/// 单次请求的日志参数
pub struct RequestInfo<'a> {
    pub api_format: &'a str,
    pub endpoint: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout: u64,
}

/// 追加句柄和当前文件行数
#[derive(Default)]
struct LogWriter {
    file: Option<File>,
    lines: usize,
}

/// 请求日志记录器
///
/// 行数超过 max_entries 加一成余量时才重写文件，平时只做追加。
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    writer: Mutex<LogWriter>,
}

impl RequestLogger {
    /// 创建新的日志记录器
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        let log_dir = log_dir.unwrap_or_else(|| crate::config::exe_dir().join("storage"));

        if let Err(e) = fs::create_dir_all(&log_dir) {
            warn!("Cannot create log dir {}: {}", log_dir.display(), e);
        }

        Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            max_entries: 1000,
            writer: Mutex::new(LogWriter::default()),
        }
    }

    /// 设置保留的最大条目数
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// 日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    /// API 密钥脱敏
    pub fn mask_api_key(api_key: &str) -> String {
        let chars: Vec<char> = api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }

    /// 截断字符串
    fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            None => s.to_string(),
            Some((idx, _)) => format!("{}...", &s[..idx]),
        }
    }

    /// 创建消息预览
    fn create_message_previews(
        messages: &[ChatMessage],
        max_messages: usize,
        max_content_len: usize,
    ) -> Vec<MessagePreview> {
        messages
            .iter()
            .take(max_messages)
            .map(|m| MessagePreview {
                role: m.role.clone(),
                content_preview: Self::truncate(&m.content, max_content_len),
            })
            .collect()
    }

    /// 记录请求开始
    pub fn log_request(&self, info: &RequestInfo<'_>) -> LogEntry {
        LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            api_format: info.api_format.to_string(),
            endpoint: info.endpoint.to_string(),
            api_key_masked: Self::mask_api_key(info.api_key),
            model: info.model.to_string(),
            messages_count: info.messages.len(),
            messages_preview: Self::create_message_previews(info.messages, 3, 200),
            temperature: info.temperature,
            max_tokens: info.max_tokens,
            timeout: info.timeout,
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            finish_reason: None,
            response_preview: None,
            error_type: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        response: &str,
        finish_reason: Option<&str>,
    ) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response.chars().count());
        entry.finish_reason = finish_reason.map(str::to_string);
        entry.response_preview = Some(Self::truncate(response, 300));
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        error_type: &str,
        error_message: &str,
        status_code: Option<u16>,
    ) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_type = Some(error_type.to_string());
        entry.error_message = Some(Self::truncate(error_message, 500));
        entry.status_code = status_code;
        self.write_entry(&entry);
    }

    /// 写入日志条目
    fn write_entry(&self, entry: &LogEntry) {
        let mut guard = self.writer.lock();
        let writer = &mut *guard;

        // 懒加载文件，已有内容只在打开时数一次
        if writer.file.is_none() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                Ok(f) => {
                    writer.lines = self.read_lines().len();
                    writer.file = Some(f);
                }
                Err(e) => warn!("Cannot open {}: {}", self.log_path.display(), e),
            }
        }

        let Some(file) = writer.file.as_mut() else {
            return;
        };
        if let Ok(json) = serde_json::to_string(entry) {
            if writeln!(file, "{}", json).is_ok() {
                writer.lines += 1;
            }
            let _ = file.flush();
        }

        if writer.lines > self.max_entries + self.max_entries / 10 {
            self.trim(writer);
        }
    }

    fn read_lines(&self) -> Vec<String> {
        match File::open(&self.log_path) {
            Ok(file) => BufReader::new(file).lines().map_while(Result::ok).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 只保留最新的 max_entries 条
    fn trim(&self, writer: &mut LogWriter) {
        let lines = self.read_lines();
        let keep = &lines[lines.len().saturating_sub(self.max_entries)..];

        // 重写前先关闭追加句柄
        writer.file = None;
        match File::create(&self.log_path) {
            Ok(mut file) => {
                for line in keep {
                    let _ = writeln!(file, "{}", line);
                }
                writer.lines = keep.len();
                writer.file = Some(file);
            }
            Err(e) => warn!("Cannot rewrite {}: {}", self.log_path.display(), e),
        }
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new(None)
    }
}
