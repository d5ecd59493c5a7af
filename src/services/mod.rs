//! 服务层模块

mod feedback_service;
mod prompt_service;

pub use feedback_service::FeedbackService;
pub use prompt_service::PromptService;
