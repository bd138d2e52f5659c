//! # 商品 AI 生成内容实体定义
//!
//! 关联商品与 AI 请求，生成内容需人工审核后才能使用

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 商品 AI 生成内容实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product_ai_generations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub ai_request_id: i32,
    pub generation_type: String,
    #[sea_orm(column_type = "Text")]
    pub original_content: String,
    #[sea_orm(column_type = "Text")]
    pub ai_generated_content: String,
    pub is_approved: bool,
    pub is_used: bool,
    pub created_at: DateTime,
    pub approved_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::ai_requests::Entity",
        from = "Column::AiRequestId",
        to = "super::ai_requests::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    AiRequest,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::ai_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 生成内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationType {
    Title,
    Description,
    Tags,
    CategorySuggestion,
    PriceSuggestion,
}

impl GenerationType {
    /// 数据库存储值
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Tags => "tags",
            Self::CategorySuggestion => "category_suggestion",
            Self::PriceSuggestion => "price_suggestion",
        }
    }
}

impl FromStr for GenerationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "tags" => Ok(Self::Tags),
            "category_suggestion" => Ok(Self::CategorySuggestion),
            "price_suggestion" => Ok(Self::PriceSuggestion),
            other => Err(format!("未知的生成类型: {other}")),
        }
    }
}
