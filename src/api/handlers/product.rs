//! # 商品提示词处理器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::response::Response;
use serde::Deserialize;

use super::{json_body, required_text};
use crate::api::middleware::CurrentUser;
use crate::api::response::outcome;
use crate::api::server::AppState;
use crate::error::Result;

/// 商品提示词请求体，各接口按需取用字段
#[derive(Debug, Default, Deserialize)]
pub struct ProductPromptRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category: Option<String>,
}

type Payload = std::result::Result<Json<ProductPromptRequest>, JsonRejection>;

/// 生成商品描述
pub async fn generate_description(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Payload,
) -> Result<Response> {
    let body = json_body(payload)?;
    let product_name = required_text(body.product_name, "product_name")?;

    let result = state
        .product_ai()
        .await?
        .generate_description(
            &product_name,
            body.image_urls,
            body.category.as_deref(),
            user.user_id(),
        )
        .await?;
    Ok(outcome(result.success, result))
}

/// 生成标题
pub async fn generate_title(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Payload,
) -> Result<Response> {
    let body = json_body(payload)?;
    let description = required_text(body.description, "description")?;

    let result = state
        .product_ai()
        .await?
        .generate_title(
            &description,
            body.image_urls,
            body.category.as_deref(),
            user.user_id(),
        )
        .await?;
    Ok(outcome(result.success, result))
}

/// 建议标签
pub async fn suggest_tags(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Payload,
) -> Result<Response> {
    let body = json_body(payload)?;
    let product_name = required_text(body.product_name, "product_name")?;
    let description = required_text(body.description, "description")?;

    let result = state
        .product_ai()
        .await?
        .suggest_tags(
            &product_name,
            &description,
            body.image_urls,
            body.category.as_deref(),
            user.user_id(),
        )
        .await?;
    Ok(outcome(result.success, result))
}

/// 分析单张图片
pub async fn analyze_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Payload,
) -> Result<Response> {
    let body = json_body(payload)?;
    let image_url = required_text(body.image_url, "image_url")?;

    let result = state
        .product_ai()
        .await?
        .analyze_image(&image_url, body.product_name.as_deref(), user.user_id())
        .await?;
    Ok(outcome(result.success, result))
}
