//! 三步分析流程的状态
//!
//! prompt → essay → feedback，外加 reset 回到初始状态、change_prompt 从 essay 回到 prompt。
//! 所有状态集中在 `EssayFlow` 一个结构体里，步骤切换只通过下面的转换函数完成。

use thiserror::Error;

use super::classify::{classify_prompt, PromptCategory};
use super::feedback::Feedback;
use super::submit::{validate_essay, FeedbackClient, SubmitError, MIN_ESSAY_CHARS};
use super::word_limit::{EssayStats, WordLimit};
use crate::models::ChatRequest;

/// 当前步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EssayStep {
    #[default]
    Prompt,
    Essay,
    Feedback,
}

/// 流程转换错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("enter the essay prompt first")]
    EmptyPrompt,
    #[error("essays can only be submitted from the essay step (current: {0:?})")]
    NotOnEssayStep(EssayStep),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// 请求进行中标记，离开作用域（包括 future 被中途丢弃）时复位
struct AnalyzingGuard<'a>(&'a mut bool);

impl<'a> AnalyzingGuard<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// 分析流程状态
#[derive(Debug, Clone, Default)]
pub struct EssayFlow {
    pub step: EssayStep,
    pub prompt_text: String,
    /// 原样保存用户输入的字数限制
    pub word_limit: String,
    pub essay: String,
    pub category: Option<PromptCategory>,
    pub is_analyzing: bool,
    pub error: Option<SubmitError>,
    pub feedback: Option<Feedback>,
}

impl EssayFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Continue to Essay" 按钮是否可用
    pub fn can_continue(&self) -> bool {
        !self.prompt_text.trim().is_empty()
    }

    /// "Analyze Essay" 按钮是否可用
    pub fn can_analyze(&self) -> bool {
        !self.is_analyzing && self.essay.chars().count() >= MIN_ESSAY_CHARS
    }

    pub fn stats(&self) -> EssayStats {
        EssayStats::of(&self.essay)
    }

    pub fn parsed_word_limit(&self) -> Option<WordLimit> {
        WordLimit::parse(&self.word_limit)
    }

    /// 文书是否超出用户填写的字数限制
    pub fn is_over_limit(&self) -> bool {
        self.parsed_word_limit()
            .is_some_and(|limit| limit.is_exceeded(&self.stats()))
    }

    /// prompt → essay：识别题目类型
    pub fn to_essay_step(self) -> Result<Self, FlowError> {
        if !self.can_continue() {
            return Err(FlowError::EmptyPrompt);
        }
        let category = classify_prompt(&self.prompt_text);
        Ok(Self {
            step: EssayStep::Essay,
            category: Some(category),
            error: None,
            ..self
        })
    }

    /// essay → prompt：保留已填写的内容
    pub fn change_prompt(self) -> Self {
        Self {
            step: EssayStep::Prompt,
            error: None,
            ..self
        }
    }

    /// essay → feedback
    pub fn to_feedback_step(self, feedback: Feedback) -> Result<Self, FlowError> {
        self.ensure_essay_step()?;
        Ok(Self {
            step: EssayStep::Feedback,
            is_analyzing: false,
            error: None,
            feedback: Some(feedback),
            ..self
        })
    }

    fn ensure_essay_step(&self) -> Result<(), FlowError> {
        match self.step {
            EssayStep::Essay => Ok(()),
            other => Err(FlowError::NotOnEssayStep(other)),
        }
    }

    /// 回到初始状态，清空题目、字数限制、文书和题目类型
    pub fn reset(self) -> Self {
        Self::default()
    }

    /// 本次提交的请求体
    pub fn request(&self) -> ChatRequest {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        ChatRequest {
            message: self.essay.clone(),
            prompt: non_empty(&self.prompt_text),
            word_limit: non_empty(&self.word_limit),
            prompt_category: self.category.map(|c| c.label().to_string()),
        }
    }

    /// 提交当前文书
    ///
    /// 只能在 essay 步骤调用；校验失败时不发请求。返回后或 future 被丢弃后 `is_analyzing` 都为 false。
    pub async fn submit(&mut self, client: &FeedbackClient) -> Result<(), FlowError> {
        self.ensure_essay_step()?;
        self.error = None;
        self.feedback = None;

        if let Err(e) = validate_essay(&self.essay) {
            self.error = Some(e.clone());
            return Err(e.into());
        }

        let request = self.request();
        let outcome = {
            let _analyzing = AnalyzingGuard::start(&mut self.is_analyzing);
            client.submit_essay(&request).await
        };

        match outcome {
            Ok(feedback) => {
                *self = std::mem::take(self).to_feedback_step(feedback)?;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e.into())
            }
        }
    }
}
