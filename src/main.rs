//! AI Essay Mentor - 反馈服务
//!
//! 使用 axum 框架构建的后端服务，把文书转发给 LLM 补全接口并返回结构化反馈。

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use essay_mentor::api::create_api_routes;
use essay_mentor::config::AppConfig;
use essay_mentor::state::create_shared_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "essay_mentor=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Essay Mentor feedback service...");

    let config = AppConfig::load();
    let addr = config.bind_addr();

    // 创建共享状态
    let state = create_shared_state(config);

    // 前端单独部署，允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 构建路由
    let app = Router::new()
        .merge(create_api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on: {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
