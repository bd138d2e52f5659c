//! # 商品 AI 服务
//!
//! 在 [`GemmaService`] 之上组织商品相关的提示词与采样参数

use serde::Serialize;
use serde_json::Value;

use super::extract::parse_json_reply;
use super::prompts;
use super::service::GemmaService;
use super::types::{GenerateParams, GenerationResult, RequestType};
use crate::error::Result;
use crate::{lwarn, logging::{LogComponent, LogStage}};

/// 自动填充的 JSON 无法解析时返回的错误信息
pub const AUTO_FILL_PARSE_ERROR: &str = "Error procesando respuesta de IA";

/// 商品完整分析的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AutoFillOutcome {
    /// 成功解析出 JSON
    Parsed {
        success: bool,
        data: Value,
        request_id: i32,
        processing_time: f64,
    },
    /// 模型已回复但内容不是合法 JSON，保留原文便于排查
    Unparseable {
        success: bool,
        error: String,
        raw_response: String,
        request_id: i32,
    },
    /// 推理调用本身失败
    Failed(GenerationResult),
}

impl AutoFillOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }

    #[must_use]
    pub const fn request_id(&self) -> i32 {
        match self {
            Self::Parsed { request_id, .. } | Self::Unparseable { request_id, .. } => *request_id,
            Self::Failed(result) => result.request_id,
        }
    }
}

/// 商品 AI 服务
#[derive(Debug, Clone)]
pub struct ProductAiService {
    gemma: GemmaService,
}

impl ProductAiService {
    #[must_use]
    pub const fn new(gemma: GemmaService) -> Self {
        Self { gemma }
    }

    #[must_use]
    pub const fn gemma(&self) -> &GemmaService {
        &self.gemma
    }

    /// 生成商品描述
    pub async fn generate_description(
        &self,
        product_name: &str,
        image_urls: Vec<String>,
        category: Option<&str>,
        user_id: Option<i32>,
    ) -> Result<GenerationResult> {
        let params = GenerateParams::new(
            prompts::description_prompt(product_name, category),
            RequestType::ProductDescription,
        )
        .with_images(image_urls)
        .with_max_tokens(300)
        .with_temperature(0.7)
        .for_user(user_id);
        self.gemma.generate_response(params).await
    }

    /// 生成 SEO 标题
    pub async fn generate_title(
        &self,
        description: &str,
        image_urls: Vec<String>,
        category: Option<&str>,
        user_id: Option<i32>,
    ) -> Result<GenerationResult> {
        let params = GenerateParams::new(
            prompts::title_prompt(description, category),
            RequestType::TextGeneration,
        )
        .with_images(image_urls)
        .with_max_tokens(100)
        .with_temperature(0.8)
        .for_user(user_id);
        self.gemma.generate_response(params).await
    }

    /// 建议标签
    pub async fn suggest_tags(
        &self,
        product_name: &str,
        description: &str,
        image_urls: Vec<String>,
        category: Option<&str>,
        user_id: Option<i32>,
    ) -> Result<GenerationResult> {
        let params = GenerateParams::new(
            prompts::tags_prompt(product_name, description, category),
            RequestType::TextGeneration,
        )
        .with_images(image_urls)
        .with_max_tokens(150)
        .with_temperature(0.6)
        .for_user(user_id);
        self.gemma.generate_response(params).await
    }

    /// 分析单张商品图片
    pub async fn analyze_image(
        &self,
        image_url: &str,
        product_name: Option<&str>,
        user_id: Option<i32>,
    ) -> Result<GenerationResult> {
        let params = GenerateParams::new(
            prompts::image_analysis_prompt(product_name),
            RequestType::ImageAnalysis,
        )
        .with_images(vec![image_url.to_string()])
        .with_max_tokens(400)
        .with_temperature(0.7)
        .for_user(user_id);
        self.gemma.generate_response(params).await
    }

    /// 根据图片生成整张商品表单（标题、描述、分类、标签、价格）
    pub async fn analyze_product_complete(
        &self,
        image_urls: Vec<String>,
        user_id: Option<i32>,
    ) -> Result<AutoFillOutcome> {
        let params = GenerateParams::new(prompts::auto_fill_prompt(), RequestType::ProductAnalysis)
            .with_images(image_urls)
            .with_max_tokens(500)
            .with_temperature(0.7)
            .for_user(user_id);

        let result = self.gemma.generate_response(params).await?;
        if !result.success {
            return Ok(AutoFillOutcome::Failed(result));
        }

        let raw_response = result.response.clone().unwrap_or_default();
        match parse_json_reply(&raw_response) {
            Ok(data) => Ok(AutoFillOutcome::Parsed {
                success: true,
                data,
                request_id: result.request_id,
                processing_time: result.processing_time,
            }),
            Err(err) => {
                lwarn!(
                    format!("ai-{}", result.request_id),
                    LogStage::Response,
                    LogComponent::ProductAi,
                    "auto_fill_unparseable",
                    "模型回复无法解析为JSON",
                    error = %err
                );
                Ok(AutoFillOutcome::Unparseable {
                    success: false,
                    error: AUTO_FILL_PARSE_ERROR.to_string(),
                    raw_response,
                    request_id: result.request_id,
                })
            }
        }
    }
}
