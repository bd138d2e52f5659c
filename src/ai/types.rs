//! # AI 模块类型定义
//!
//! 推理服务的请求/响应结构，以及服务层的参数与结果类型

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub use entity::ai_requests::{RequestStatus, RequestType};
pub use entity::product_ai_generations::GenerationType;

/// 解析请求类型，未知值视为校验错误
pub fn parse_request_type(value: &str) -> Result<RequestType> {
    value
        .parse()
        .map_err(|message: String| AppError::validation(message, Some("request_type")))
}

/// 解析请求状态
pub fn parse_request_status(value: &str) -> Result<RequestStatus> {
    value
        .parse()
        .map_err(|message: String| AppError::validation(message, Some("status")))
}

/// 解析生成内容类型
pub fn parse_generation_type(value: &str) -> Result<GenerationType> {
    value
        .parse()
        .map_err(|message: String| AppError::validation(message, Some("generation_type")))
}

// === 推理服务协议（OpenAI 兼容） ===

/// `POST /v1/chat/completions` 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: i32,
    pub temperature: f64,
    pub stream: bool,
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// 消息内容块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// 推理服务响应中用到的部分
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: i32,
}

impl ChatCompletionResponse {
    /// 第一个候选的文本
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_deref().unwrap_or_default())
    }

    #[must_use]
    pub fn total_tokens(&self) -> i32 {
        self.usage.as_ref().map_or(0, |usage| usage.total_tokens)
    }
}

// === 服务层类型 ===

/// 一次生成调用的参数
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f64>,
    pub request_type: RequestType,
    pub user_id: Option<i32>,
}

impl GenerateParams {
    pub fn new(prompt: impl Into<String>, request_type: RequestType) -> Self {
        Self {
            prompt: prompt.into(),
            image_urls: Vec::new(),
            max_tokens: None,
            temperature: None,
            request_type,
            user_id: None,
        }
    }

    #[must_use]
    pub fn with_images(mut self, image_urls: Vec<String>) -> Self {
        self.image_urls = image_urls;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn for_user(mut self, user_id: Option<i32>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// 生成调用的结构化结果
///
/// 调用失败也以 `success = false` 的结果返回，而不是 `Err`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tokens_used: i32,
    /// 处理耗时（秒）
    pub processing_time: f64,
    pub request_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerationResult {
    #[must_use]
    pub fn completed(
        request_id: i32,
        response: String,
        tokens_used: i32,
        processing_time: f64,
        model: String,
    ) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
            tokens_used,
            processing_time,
            request_id,
            model: Some(model),
        }
    }

    #[must_use]
    pub const fn failed(request_id: i32, error: String, processing_time: f64) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
            tokens_used: 0,
            processing_time,
            request_id,
            model: None,
        }
    }
}

/// 推理服务健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// 健康检查报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    #[must_use]
    pub fn healthy(endpoint: String, model: String, response: String) -> Self {
        Self {
            status: HealthStatus::Healthy,
            endpoint,
            model: Some(model),
            response: Some(response),
            error: None,
        }
    }

    #[must_use]
    pub const fn unhealthy(endpoint: String, error: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            endpoint,
            model: None,
            response: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_content_blocks_use_type_tag() {
        let blocks = vec![
            ContentBlock::Text {
                text: "hola".to_string(),
            },
            ContentBlock::ImageUrl {
                image_url: ImageUrl {
                    url: "https://cdn.example.com/a.jpg".to_string(),
                },
            },
        ];

        assert_eq!(
            serde_json::to_value(&blocks).unwrap(),
            json!([
                {"type": "text", "text": "hola"},
                {"type": "image_url", "image_url": {"url": "https://cdn.example.com/a.jpg"}}
            ])
        );
    }

    #[test]
    fn test_response_parsing_tolerates_missing_usage() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "listo"}}]
        }))
        .unwrap();

        assert_eq!(response.first_content(), Some("listo"));
        assert_eq!(response.total_tokens(), 0);

        let empty: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn test_failed_result_omits_response_and_model() {
        let value = serde_json::to_value(GenerationResult::failed(
            9,
            "Request error: timeout".to_string(),
            1.5,
        ))
        .unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["request_id"], json!(9));
        assert!(value.get("response").is_none());
        assert!(value.get("model").is_none());
    }

    #[test]
    fn test_parse_request_type_rejects_unknown() {
        assert_eq!(
            parse_request_type("image_analysis").unwrap(),
            RequestType::ImageAnalysis
        );
        assert!(matches!(
            parse_request_type("summarize"),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_health_report_serialization() {
        let report = HealthReport::unhealthy("http://gemma".to_string(), "HTTP 502".to_string());
        assert!(!report.is_healthy());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"status": "unhealthy", "endpoint": "http://gemma", "error": "HTTP 502"})
        );
    }
}
