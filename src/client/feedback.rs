//! 客户端持有的反馈结果

use tracing::warn;

use crate::models::EssayFeedback;

/// 一次分析的结果
///
/// 约定的格式是结构化对象；无法严格解析的回复整体降级为纯文本，不做部分解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Structured(EssayFeedback),
    PlainText(String),
}

impl Feedback {
    /// 从服务端的 `reply` 字段构造
    pub fn from_reply(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        match EssayFeedback::parse(&reply) {
            Ok(feedback) => Feedback::Structured(feedback),
            Err(e) => {
                warn!("Falling back to plain-text feedback: {}", e);
                Feedback::PlainText(reply)
            }
        }
    }

    pub fn readiness_score(&self) -> Option<u8> {
        match self {
            Feedback::Structured(f) => Some(f.readiness_score),
            Feedback::PlainText(_) => None,
        }
    }

    pub fn band(&self) -> Option<ReadinessBand> {
        self.readiness_score().map(ReadinessBand::from_score)
    }
}

/// 分数档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBand {
    Strong,
    Good,
    NeedsRevision,
}

impl ReadinessBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ReadinessBand::Strong
        } else if score >= 60 {
            ReadinessBand::Good
        } else {
            ReadinessBand::NeedsRevision
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadinessBand::Strong => "Strong essay - minor polish needed",
            ReadinessBand::Good => "Good foundation - strategic improvements needed",
            ReadinessBand::NeedsRevision => "Needs significant revision",
        }
    }
}
