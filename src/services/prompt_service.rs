//! Prompt 构建服务
//!
//! 固定的系统指令 + 可选的题目上下文 + 文书正文。

use crate::llm::ChatMessage;
use crate::models::ChatRequest;

/// 系统提示词
const SYSTEM_PROMPT: &str = r#"You are an expert on admissions essays for universities and programs abroad.
Your task is to give honest, constructive and detailed feedback on a student's essay.
Always answer in English. Be motivating and supportive.

Cover, in this order of importance:
1. Overall assessment (strengths and the main problems)
2. Structure and logic
3. Language, grammar and style
4. Concrete improvement suggestions, with example phrases
5. A score on a 1-10 scale with justification

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "overallSummary": string, the overall assessment; end it with "Score: N/10" and the justification,
  "structuralIssues": [{"section": string, "issue": string, "suggestion": string}],
  "suggestions": [{"id": string, "originalText": string, "correctedText": string,
                   "type": "grammar" | "clarity" | "structure" | "impact" | "tone",
                   "explanation": string}],
  "promptAlignment": {"aligned": string, "notAligned": string},
  "improvementPlan": [string],
  "readinessScore": integer from 0 to 100,
  "strengths": [string],
  "redFlags": [string],
  "rewriteSuggestion": string, an example rewrite of the introduction
}"#;

/// 上下文中题目的最大长度
const MAX_PROMPT_LENGTH: usize = 2000;

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 系统指令
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    /// 构建反馈请求的消息列表
    ///
    /// 用户消息始终是原样的文书正文；题目信息放在单独的系统消息中。
    pub fn build_feedback_messages(&self, request: &ChatRequest) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];

        let mut context_parts = Vec::new();

        if let Some(prompt) = non_blank(request.prompt.as_deref()) {
            context_parts.push(format!(
                "Essay prompt:\n\"\"\"\n{}\n\"\"\"",
                Self::truncate_content(prompt, MAX_PROMPT_LENGTH)
            ));
        }

        if let Some(category) = non_blank(request.prompt_category.as_deref()) {
            context_parts.push(format!("Detected prompt type: {}", category));
        }

        if let Some(limit) = non_blank(request.word_limit.as_deref()) {
            context_parts.push(format!("Word limit: {}", limit));
        }

        if !context_parts.is_empty() {
            let context_message = format!(
                "Judge prompt alignment against this context:\n\n{}",
                context_parts.join("\n\n")
            );
            messages.push(ChatMessage::system(context_message));
        }

        messages.push(ChatMessage::user(request.message.clone()));

        messages
    }

    /// 截断内容
    fn truncate_content(content: &str, max_chars: usize) -> String {
        match content.char_indices().nth(max_chars) {
            None => content.to_string(),
            Some((idx, _)) => format!("{}... (truncated)", &content[..idx]),
        }
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
