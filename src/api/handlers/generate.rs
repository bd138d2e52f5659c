//! # 推理与健康检查处理器

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::Multipart;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::{json_body, required_text};
use crate::ai::payload::image_data_url;
use crate::ai::types::{GenerateParams, HealthReport, RequestType, parse_request_type};
use crate::api::middleware::CurrentUser;
use crate::api::response::outcome;
use crate::api::server::AppState;
use crate::error::{AppError, Result};
use crate::{linfo, lwarn};
use crate::logging::{LogComponent, LogStage};

/// `POST /generate/` 请求体
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f64>,
    pub request_type: Option<String>,
}

impl GenerateRequest {
    /// 校验并转换为生成参数
    pub fn into_params(self, user_id: Option<i32>) -> Result<GenerateParams> {
        let prompt = required_text(self.prompt, "prompt")?;
        let request_type = match self.request_type.as_deref() {
            Some(value) => parse_request_type(value)?,
            None => RequestType::default(),
        };

        let mut params = GenerateParams::new(prompt, request_type)
            .with_images(self.image_urls)
            .for_user(user_id);
        if let Some(max_tokens) = self.max_tokens {
            params = params.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature);
        }
        Ok(params)
    }
}

/// 通用生成
pub async fn generate_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response> {
    let params = json_body(payload)?.into_params(user.user_id())?;
    let gemma = state.gemma().await?;
    let result = gemma.generate_response(params).await?;
    Ok(outcome(result.success, result))
}

/// 推理服务健康检查，配置无法读取时同样视为不健康
pub async fn health_handler(State(state): State<AppState>) -> Result<Response> {
    let report = match state.gemma().await {
        Ok(gemma) => gemma.health_check().await,
        Err(err) => {
            lwarn!(
                "system",
                LogStage::HealthCheck,
                LogComponent::Gemma,
                "health_config_unavailable",
                "读取AI配置失败，健康检查不可用",
                error = %err
            );
            HealthReport::unhealthy(state.config().ai.endpoint.clone(), err.to_string())
        }
    };
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status, Json(report)).into_response())
}

/// `POST /analyze-product/` 的 JSON 请求体
#[derive(Debug, Deserialize)]
pub struct AnalyzeProductRequest {
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

impl AnalyzeProductRequest {
    /// `image_urls` 优先，否则使用单个 `image_url`
    pub fn into_image_urls(self) -> Vec<String> {
        let urls = match (self.image_urls, self.image_url) {
            (Some(urls), _) if !urls.is_empty() => urls,
            (_, Some(url)) => vec![url],
            _ => Vec::new(),
        };
        urls.into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect()
    }
}

/// 根据图片自动填充商品表单
///
/// 接受 `multipart/form-data`（一个或多个 `image` 文件，按上传顺序转换为 data URL）
/// 或 JSON `{image_url}` / `{image_urls}`。
pub async fn analyze_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    request: Request,
) -> Result<Response> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let image_urls = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text(), Some("image")))?;
        collect_uploaded_images(multipart).await?
    } else {
        let payload = Json::<AnalyzeProductRequest>::from_request(request, &state).await;
        json_body(payload)?.into_image_urls()
    };

    if image_urls.is_empty() {
        return Err(AppError::validation(
            "需要上传图片或提供 image_url",
            Some("image"),
        ));
    }

    linfo!(
        "system",
        LogStage::RequestStart,
        LogComponent::Api,
        "analyze_product",
        "收到商品自动填充请求",
        images = image_urls.len(),
        multipart = is_multipart
    );

    let service = state.product_ai().await?;
    let result = service
        .analyze_product_complete(image_urls, user.user_id())
        .await?;
    Ok(outcome(result.is_success(), result))
}

/// 按上传顺序把 `image` 字段转换为 data URL
async fn collect_uploaded_images(mut multipart: Multipart) -> Result<Vec<String>> {
    let mut image_urls = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().map(ToOwned::to_owned);
        let bytes: Bytes = field.bytes().await?;
        if bytes.is_empty() {
            continue;
        }
        image_urls.push(image_data_url(&bytes, content_type.as_deref()));
    }
    Ok(image_urls)
}
