//! 数据模型

mod api;
mod feedback;

pub use api::*;
pub use feedback::*;
