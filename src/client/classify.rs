//! 题目类型识别
//!
//! 大小写不敏感的关键词子串匹配，按组顺序第一个命中者胜出。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptCategory {
    /// "Why this program?"
    Motivational,
    Leadership,
    PersonalChallenge,
    #[default]
    PersonalStatement,
}

impl PromptCategory {
    /// 界面显示的标签
    pub fn label(&self) -> &'static str {
        match self {
            PromptCategory::Motivational => r#"Motivational Essay - "Why this program?""#,
            PromptCategory::Leadership => "Leadership Experience Essay",
            PromptCategory::PersonalChallenge => "Personal Challenge / Growth Essay",
            PromptCategory::PersonalStatement => "Personal Statement",
        }
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 关键词组，顺序即优先级
const KEYWORD_GROUPS: &[(&[&str], PromptCategory)] = &[
    (&["why"], PromptCategory::Motivational),
    (&["leadership"], PromptCategory::Leadership),
    (&["challenge", "obstacle"], PromptCategory::PersonalChallenge),
];

/// 识别题目类型，未命中任何关键词时为 PersonalStatement
pub fn classify_prompt(prompt: &str) -> PromptCategory {
    let lowered = prompt.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}
