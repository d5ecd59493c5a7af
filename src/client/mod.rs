//! 文书提交客户端
//!
//! 收集题目与文书、识别题目类型、校验长度、调用反馈服务并渲染结果。

mod classify;
mod feedback;
mod flow;
mod render;
mod submit;
mod word_limit;

pub use classify::{classify_prompt, PromptCategory};
pub use feedback::{Feedback, ReadinessBand};
pub use flow::{EssayFlow, EssayStep, FlowError};
pub use render::{render_feedback, FeedbackTab, FeedbackView};
pub use submit::{
    validate_essay, FeedbackClient, SubmitError, CONNECTIVITY_ERROR_MESSAGE, MIN_ESSAY_CHARS,
    SERVER_ERROR_MESSAGE,
};
pub use word_limit::{EssayStats, WordLimit};
