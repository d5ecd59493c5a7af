//! 健康检查端点

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;
use std::sync::Arc;

/// 健康检查处理器
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "upstreamConfigured": state.feedback.is_configured()
    }))
}

/// 创建健康检查路由
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn health_of(api_key: &str) -> Value {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            api_key: api_key.to_string(),
            log_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let app = health_routes().with_state(Arc::new(AppState::new(config)));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_upstream_configuration() {
        assert_eq!(
            health_of("sk-test").await,
            json!({ "status": "ok", "upstreamConfigured": true })
        );
        assert_eq!(
            health_of("").await,
            json!({ "status": "ok", "upstreamConfigured": false })
        );
    }
}
