//! # 商品生成内容处理器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::response::Response;
use serde::Deserialize;

use super::json_body;
use crate::ai::types::parse_generation_type;
use crate::api::middleware::CurrentUser;
use crate::api::response::{success, success_with_message};
use crate::api::server::AppState;
use crate::error::{AppError, Result};

/// 记录生成内容的请求体
#[derive(Debug, Deserialize)]
pub struct CreateGenerationRequest {
    pub request_id: Option<i32>,
    pub generation_type: Option<String>,
    #[serde(default)]
    pub original_content: String,
}

/// 商品的全部生成内容
pub async fn list_generations(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<i32>,
) -> Result<Response> {
    let ctx = user.require()?;
    let store = state.generations();
    store
        .authorize_product(product_id, ctx.user_id, ctx.is_staff)
        .await?;
    Ok(success(store.list_for_product(product_id).await?))
}

/// 把一次已完成的请求记录为商品生成内容
pub async fn create_generation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<i32>,
    payload: std::result::Result<Json<CreateGenerationRequest>, JsonRejection>,
) -> Result<Response> {
    let ctx = user.require()?;
    let body = json_body(payload)?;
    let request_id = body
        .request_id
        .ok_or_else(|| AppError::validation("缺少必填字段: request_id", Some("request_id")))?;
    let generation_type = parse_generation_type(body.generation_type.as_deref().ok_or_else(
        || AppError::validation("缺少必填字段: generation_type", Some("generation_type")),
    )?)?;

    let store = state.generations();
    store
        .authorize_product(product_id, ctx.user_id, ctx.is_staff)
        .await?;
    let generation = store
        .record(
            product_id,
            request_id,
            (!ctx.is_staff).then_some(ctx.user_id),
            generation_type,
            &body.original_content,
        )
        .await?;
    Ok(success_with_message(generation, "生成内容已记录"))
}

/// 审核通过
pub async fn approve_generation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(generation_id): Path<i32>,
) -> Result<Response> {
    let ctx = user.require()?;
    let store = state.generations();
    let generation = store.find(generation_id).await?;
    store
        .authorize_product(generation.product_id, ctx.user_id, ctx.is_staff)
        .await?;
    Ok(success(store.approve(generation_id).await?))
}

/// 标记为已使用
pub async fn use_generation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(generation_id): Path<i32>,
) -> Result<Response> {
    let ctx = user.require()?;
    let store = state.generations();
    let generation = store.find(generation_id).await?;
    store
        .authorize_product(generation.product_id, ctx.user_id, ctx.is_staff)
        .await?;
    Ok(success(store.mark_used(generation_id).await?))
}
