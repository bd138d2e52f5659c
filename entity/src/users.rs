//! # 用户实体定义
//!
//! 市场用户基础信息表的 Sea-ORM 实体模型（认证视图不在本服务内）

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::ai_requests::Entity")]
    AiRequests,
    #[sea_orm(has_many = "super::ai_usage_stats::Entity")]
    AiUsageStats,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::ai_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiRequests.def()
    }
}

impl Related<super::ai_usage_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiUsageStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
