//! # AI 服务配置实体定义
//!
//! 保存推理端点、凭证和默认模型参数；服务只使用第一条启用的记录

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// AI 服务配置实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// 推理服务端点
    pub endpoint: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens_default: i32,
    pub temperature_default: f64,
    pub timeout_seconds: i32,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 脱敏后的 API Key，仅保留首尾字符
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}
