//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。请求之间没有可变共享数据。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::FeedbackService;
use crate::utils::RequestLogger;

/// 应用共享状态
///
/// 使用 Arc 包裹以便在多个处理器之间安全共享
pub struct AppState {
    /// 启动时加载的配置
    pub config: AppConfig,
    /// 反馈服务（进程内复用同一个上游客户端）
    pub feedback: FeedbackService,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: AppConfig) -> Self {
        let logger = Arc::new(RequestLogger::new(config.log_dir.clone()));
        let feedback = FeedbackService::new(&config, Some(logger));
        Self { config, feedback }
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(config: AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config))
}
