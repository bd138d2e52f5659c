//! # AI 使用统计实体定义
//!
//! 每个 (用户, 日期) 一行，计数器只增不减

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// AI 每日使用统计实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_usage_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub date: Date,

    // === 计数器 ===
    pub total_requests: i32,
    pub successful_requests: i32,
    pub failed_requests: i32,
    pub total_tokens_used: i32,

    // === 按请求类型计数 ===
    pub product_description_requests: i32,
    pub image_analysis_requests: i32,
    pub text_generation_requests: i32,
    pub chat_requests: i32,
    pub product_analysis_requests: i32,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Column {
    /// 请求类型对应的计数列
    #[must_use]
    pub const fn for_request_type(request_type: super::ai_requests::RequestType) -> Self {
        use super::ai_requests::RequestType;
        match request_type {
            RequestType::ProductDescription => Self::ProductDescriptionRequests,
            RequestType::ImageAnalysis => Self::ImageAnalysisRequests,
            RequestType::TextGeneration => Self::TextGenerationRequests,
            RequestType::Chat => Self::ChatRequests,
            RequestType::ProductAnalysis => Self::ProductAnalysisRequests,
        }
    }
}

impl Model {
    /// 成功率（百分比）
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests > 0 {
            f64::from(self.successful_requests) / f64::from(self.total_requests) * 100.0
        } else {
            0.0
        }
    }
}
