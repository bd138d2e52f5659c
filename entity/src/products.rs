//! # 商品实体定义
//!
//! 商品目录表的 Sea-ORM 实体模型，AI 生成内容通过 `product_ai_generations` 关联

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 商品实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    /// 图片存储路径
    pub image: String,
    pub seller_id: i32,
    /// draft / published
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Seller,
    #[sea_orm(has_many = "super::product_ai_generations::Entity")]
    AiGenerations,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::product_ai_generations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiGenerations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 商品发布状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// 草稿
    Draft,
    /// 已发布
    Published,
}

impl ProductStatus {
    /// 数据库存储值
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}
