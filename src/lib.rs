//! AI Essay Mentor
//!
//! 留学申请文书反馈：服务端把文书转发给 LLM 补全接口，客户端负责题目分类、
//! 校验、提交以及反馈渲染。

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
