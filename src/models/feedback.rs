//! 结构化文书反馈
//!
//! 模型按约定返回一个 JSON 对象；这里定义它的严格结构。字段名沿用前端约定的 camelCase。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 准备度分数上限
pub const MAX_READINESS_SCORE: u8 = 100;

/// 结构问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIssue {
    pub section: String,
    pub issue: String,
    pub suggestion: String,
}

/// 行内修改建议的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Grammar,
    Clarity,
    Structure,
    Impact,
    Tone,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Grammar => "grammar",
            SuggestionKind::Clarity => "clarity",
            SuggestionKind::Structure => "structure",
            SuggestionKind::Impact => "impact",
            SuggestionKind::Tone => "tone",
        }
    }
}

/// 行内修改建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub original_text: String,
    pub corrected_text: String,
    #[serde(rename = "type", alias = "category")]
    pub kind: SuggestionKind,
    pub explanation: String,
}

/// 是否回应了题目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAlignment {
    pub aligned: String,
    pub not_aligned: String,
}

/// 完整的结构化反馈
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayFeedback {
    pub overall_summary: String,
    pub structural_issues: Vec<StructuralIssue>,
    pub suggestions: Vec<Suggestion>,
    pub prompt_alignment: PromptAlignment,
    pub improvement_plan: Vec<String>,
    pub readiness_score: u8,
    pub strengths: Vec<String>,
    pub red_flags: Vec<String>,
    pub rewrite_suggestion: String,
}

/// 结构化解析失败
#[derive(Debug, Error)]
pub enum FeedbackParseError {
    #[error("reply is not a feedback object: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("readiness score {0} is above 100")]
    ScoreOutOfRange(u8),
}

impl EssayFeedback {
    /// 严格解析模型回复
    ///
    /// 只接受一个 JSON 对象，允许外层包一层 ```json 代码块。
    pub fn parse(reply: &str) -> Result<Self, FeedbackParseError> {
        let feedback: EssayFeedback = serde_json::from_str(strip_code_fence(reply))?;
        if feedback.readiness_score > MAX_READINESS_SCORE {
            return Err(FeedbackParseError::ScoreOutOfRange(feedback.readiness_score));
        }
        Ok(feedback)
    }
}

/// 去掉 markdown 代码块包裹
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // 去掉紧跟在 ``` 后的语言标记，如 json
    let body = body.trim_start();
    let tag_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    body[tag_len..].trim()
}
