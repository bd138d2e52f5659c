//! # 推理请求载荷构建

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use entity::ai_configurations;

use super::types::{ChatCompletionRequest, ChatMessage, ContentBlock, GenerateParams, ImageUrl};

/// 上传图片未声明类型时使用的 MIME
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// 构建单条用户消息：文本块在前，随后每个图片 URL 一个图片块，顺序不变
#[must_use]
pub fn build_messages(prompt: &str, image_urls: &[String]) -> Vec<ChatMessage> {
    let mut content = Vec::with_capacity(image_urls.len() + 1);
    content.push(ContentBlock::Text {
        text: prompt.to_string(),
    });
    content.extend(image_urls.iter().map(|url| ContentBlock::ImageUrl {
        image_url: ImageUrl { url: url.clone() },
    }));

    vec![ChatMessage {
        role: "user".to_string(),
        content,
    }]
}

/// 实际生效的 (`max_tokens`, temperature)，未指定时取配置默认值
#[must_use]
pub fn resolve_sampling(config: &ai_configurations::Model, params: &GenerateParams) -> (i32, f64) {
    (
        params.max_tokens.unwrap_or(config.max_tokens_default),
        params.temperature.unwrap_or(config.temperature_default),
    )
}

/// 构建推理请求体
#[must_use]
pub fn build_payload(
    config: &ai_configurations::Model,
    params: &GenerateParams,
) -> ChatCompletionRequest {
    let (max_tokens, temperature) = resolve_sampling(config, params);
    ChatCompletionRequest {
        model: config.model_name.clone(),
        messages: build_messages(&params.prompt, &params.image_urls),
        max_tokens,
        temperature,
        stream: false,
    }
}

/// `{endpoint}/v1/chat/completions`
#[must_use]
pub fn completions_url(endpoint: &str) -> String {
    format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
}

/// 健康检查地址，即端点根路径
#[must_use]
pub fn health_url(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_end_matches('/'))
}

/// 将图片字节编码为 base64 data URL
#[must_use]
pub fn image_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let content_type = content_type
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::RequestType;
    use crate::testing::fixtures::ai_configuration_model;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages_keep_image_order() {
        let urls = vec![
            "https://cdn.example.com/1.jpg".to_string(),
            "data:image/png;base64,AAAA".to_string(),
            "https://cdn.example.com/3.jpg".to_string(),
        ];
        let messages = build_messages("describe", &urls);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        let content = &messages[0].content;
        assert_eq!(content.len(), 4);
        assert!(matches!(&content[0], ContentBlock::Text { text } if text == "describe"));
        for (block, url) in content[1..].iter().zip(&urls) {
            assert!(matches!(block, ContentBlock::ImageUrl { image_url } if &image_url.url == url));
        }
    }

    #[test]
    fn test_payload_uses_config_defaults() {
        let config = ai_configuration_model("http://gemma.local");
        let payload = build_payload(&config, &GenerateParams::new("hola", RequestType::Chat));

        assert_eq!(payload.model, "google/gemma-3-4b-it");
        assert_eq!(payload.max_tokens, 256);
        assert!((payload.temperature - 0.7).abs() < f64::EPSILON);
        assert!(!payload.stream);
    }

    #[test]
    fn test_payload_honors_explicit_zero_temperature() {
        let config = ai_configuration_model("http://gemma.local");
        let params = GenerateParams::new("hola", RequestType::Chat)
            .with_max_tokens(42)
            .with_temperature(0.0);
        let payload = build_payload(&config, &params);

        assert_eq!(payload.max_tokens, 42);
        assert!(payload.temperature.abs() < f64::EPSILON);
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            completions_url("https://gemma.example.com/"),
            "https://gemma.example.com/v1/chat/completions"
        );
        assert_eq!(health_url("http://localhost:8001"), "http://localhost:8001/");
    }

    #[test]
    fn test_image_data_url() {
        assert_eq!(
            image_data_url(b"abc", Some("image/png")),
            "data:image/png;base64,YWJj"
        );
        assert_eq!(image_data_url(b"abc", None), "data:image/jpeg;base64,YWJj");
        assert_eq!(image_data_url(b"", Some("")), "data:image/jpeg;base64,");
    }
}
