//! 配置模块

mod app_config;

pub use app_config::AppConfig;
pub(crate) use app_config::exe_dir;
