//! # 推理服务 Mock
//!
//! 基于 wiremock 的 OpenAI 兼容端点

use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 模拟的 Gemma 推理服务
pub struct MockGemmaServer {
    server: MockServer,
}

/// 标准的 chat completion 响应体
#[must_use]
pub fn completion_body(content: &str, total_tokens: i32) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": total_tokens - 10, "total_tokens": total_tokens}
    })
}

impl MockGemmaServer {
    /// 启动 Mock 服务器
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// 获取服务器 URI
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// 成功的补全响应
    pub async fn mock_completion(&self, content: &str, total_tokens: i32) {
        self.mock_completion_delayed(content, total_tokens, Duration::ZERO)
            .await;
    }

    /// 延迟返回的补全响应
    pub async fn mock_completion_delayed(&self, content: &str, total_tokens: i32, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(content, total_tokens))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// 补全接口返回指定状态码
    pub async fn mock_completion_status(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// 补全接口返回任意 JSON
    pub async fn mock_completion_json(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// 根路径健康检查
    pub async fn mock_health(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// 已收到的补全请求体
    pub async fn received_payloads(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/v1/chat/completions")
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// 已收到请求的 Authorization 头
    pub async fn received_authorization(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(ToOwned::to_owned)
            })
            .collect()
    }
}
