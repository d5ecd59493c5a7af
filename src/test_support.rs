//! 测试用的本地桩服务器
//!
//! 绑定 127.0.0.1:0 的真实 axum 服务，记录命中次数和最后一次请求。

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_method: Arc<Mutex<Option<Method>>>,
    status: StatusCode,
    content_type: &'static str,
    body: Arc<String>,
    delay: Duration,
}

async fn respond(State(s): State<StubState>, method: Method, body: Bytes) -> Response {
    s.hits.fetch_add(1, Ordering::SeqCst);
    *s.last_body.lock() = serde_json::from_slice(&body).ok();
    *s.last_method.lock() = Some(method);
    if !s.delay.is_zero() {
        tokio::time::sleep(s.delay).await;
    }
    (
        s.status,
        [(header::CONTENT_TYPE, s.content_type)],
        s.body.to_string(),
    )
        .into_response()
}

/// 桩服务器
pub struct StubServer {
    addr: SocketAddr,
    state: StubState,
}

impl StubServer {
    /// 在指定路径上固定返回 status + body
    pub async fn spawn(path: &str, status: u16, content_type: &'static str, body: String) -> Self {
        Self::spawn_delayed(path, status, content_type, body, Duration::ZERO).await
    }

    /// 同上，但每次响应前先等待 delay
    pub async fn spawn_delayed(
        path: &str,
        status: u16,
        content_type: &'static str,
        body: String,
        delay: Duration,
    ) -> Self {
        let state = StubState {
            hits: Arc::new(AtomicUsize::new(0)),
            last_body: Arc::new(Mutex::new(None)),
            last_method: Arc::new(Mutex::new(None)),
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body: Arc::new(body),
            delay,
        };

        let app = Router::new()
            .route(path, any(respond))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// OpenAI 兼容上游：成功返回一条补全
    pub async fn openai_reply(content: &str) -> Self {
        let body = json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });
        Self::spawn("/v1/chat/completions", 200, "application/json", body.to_string()).await
    }

    /// OpenAI 兼容上游：迟迟不响应
    pub async fn openai_stalled(delay: Duration) -> Self {
        Self::spawn_delayed("/v1/chat/completions", 200, "application/json", "{}".to_string(), delay)
            .await
    }

    /// 反馈服务端点：迟迟不响应
    pub async fn chat_stalled(delay: Duration) -> Self {
        let body = json!({ "reply": "late" });
        Self::spawn_delayed("/api/chat", 200, "application/json", body.to_string(), delay).await
    }

    /// OpenAI 兼容上游：返回错误状态
    pub async fn openai_failure(status: u16, body: &str) -> Self {
        Self::spawn("/v1/chat/completions", status, "application/json", body.to_string()).await
    }

    /// 反馈服务端点：返回 `{"reply": ...}`
    pub async fn chat_reply(reply: &str) -> Self {
        let body = json!({ "reply": reply });
        Self::spawn("/api/chat", 200, "application/json", body.to_string()).await
    }

    /// 反馈服务端点：返回任意 JSON
    pub async fn chat_json(status: u16, body: Value) -> Self {
        Self::spawn("/api/chat", status, "application/json", body.to_string()).await
    }

    /// 反馈服务端点：返回纯文本
    pub async fn chat_text(status: u16, body: &str) -> Self {
        Self::spawn("/api/chat", status, "text/plain", body.to_string()).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.state.last_body.lock().clone()
    }

    pub fn last_method(&self) -> Option<Method> {
        self.state.last_method.lock().clone()
    }
}

/// 一个没有任何服务监听的本地地址
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// 一份合法的结构化反馈 JSON
pub fn sample_feedback_json(score: u32) -> String {
    json!({
        "overallSummary": "A sincere essay with a clear motivation. Score: 7/10, the story is strong but the ending is generic.",
        "structuralIssues": [
            { "section": "Introduction", "issue": "Opens with a quote", "suggestion": "Start with your own moment" }
        ],
        "suggestions": [
            {
                "id": "s1",
                "originalText": "I am very passionate",
                "correctedText": "I spent two summers building",
                "type": "impact",
                "explanation": "Show, do not tell."
            }
        ],
        "promptAlignment": { "aligned": "Explains why the program", "notAligned": "Missing future goals" },
        "improvementPlan": ["Rewrite the opening", "Add one concrete result"],
        "readinessScore": score,
        "strengths": ["Authentic voice"],
        "redFlags": ["Generic conclusion"],
        "rewriteSuggestion": "The night our robot failed, I learned..."
    })
    .to_string()
}
