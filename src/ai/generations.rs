//! # 商品 AI 生成内容
//!
//! 把已完成请求的回复关联到商品，待人工审核后使用

use chrono::Utc;
use entity::{ai_requests, product_ai_generations, products};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use super::types::{GenerationType, RequestStatus};
use crate::error::{AppError, Result};
use crate::{ensure_business, linfo, logging::{LogComponent, LogStage}};

/// 生成内容存储
#[derive(Debug, Clone)]
pub struct GenerationStore {
    db: Arc<DatabaseConnection>,
}

impl GenerationStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 校验调用者是否可操作该商品（卖家本人或工作人员）
    pub async fn authorize_product(
        &self,
        product_id: i32,
        user_id: i32,
        is_staff: bool,
    ) -> Result<products::Model> {
        let product = products::Entity::find_by_id(product_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("product", product_id))?;

        if !is_staff && product.seller_id != user_id {
            return Err(AppError::permission("只能操作自己的商品"));
        }
        Ok(product)
    }

    /// 查询单条生成内容
    pub async fn find(&self, generation_id: i32) -> Result<product_ai_generations::Model> {
        product_ai_generations::Entity::find_by_id(generation_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("product_ai_generation", generation_id))
    }

    /// 记录一次生成内容，复制已完成请求的回复文本
    ///
    /// `owner` 为 `Some` 时只能引用该用户自己的请求，`None` 表示工作人员不受限
    pub async fn record(
        &self,
        product_id: i32,
        ai_request_id: i32,
        owner: Option<i32>,
        generation_type: GenerationType,
        original_content: &str,
    ) -> Result<product_ai_generations::Model> {
        products::Entity::find_by_id(product_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("product", product_id))?;

        let mut query = ai_requests::Entity::find_by_id(ai_request_id);
        if let Some(user_id) = owner {
            query = query.filter(ai_requests::Column::UserId.eq(user_id));
        }
        let request = query
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("ai_request", ai_request_id))?;

        ensure_business!(
            request.get_status() == Some(RequestStatus::Completed),
            "AI请求 {} 尚未完成 (status={})",
            ai_request_id,
            request.status
        );

        let generation = product_ai_generations::ActiveModel {
            product_id: Set(product_id),
            ai_request_id: Set(ai_request_id),
            generation_type: Set(generation_type.as_str().to_string()),
            original_content: Set(original_content.to_string()),
            ai_generated_content: Set(request.response_text.unwrap_or_default()),
            is_approved: Set(false),
            is_used: Set(false),
            created_at: Set(Utc::now().naive_utc()),
            approved_at: Set(None),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        linfo!(
            format!("ai-{ai_request_id}"),
            LogStage::Db,
            LogComponent::ProductAi,
            "generation_recorded",
            "已记录商品AI生成内容",
            product_id = product_id,
            generation_id = generation.id,
            generation_type = generation_type.as_str()
        );
        Ok(generation)
    }

    /// 审核通过
    pub async fn approve(&self, generation_id: i32) -> Result<product_ai_generations::Model> {
        let mut active = self.find(generation_id).await?.into_active_model();
        active.is_approved = Set(true);
        active.approved_at = Set(Some(Utc::now().naive_utc()));
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// 标记为已使用，要求已审核
    pub async fn mark_used(&self, generation_id: i32) -> Result<product_ai_generations::Model> {
        let generation = self.find(generation_id).await?;
        ensure_business!(generation.is_approved, "生成内容 {} 尚未审核", generation_id);

        let mut active = generation.into_active_model();
        active.is_used = Set(true);
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// 商品的全部生成内容，最新在前
    pub async fn list_for_product(
        &self,
        product_id: i32,
    ) -> Result<Vec<product_ai_generations::Model>> {
        Ok(product_ai_generations::Entity::find()
            .filter(product_ai_generations::Column::ProductId.eq(product_id))
            .order_by_desc(product_ai_generations::Column::CreatedAt)
            .order_by_desc(product_ai_generations::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }
}
