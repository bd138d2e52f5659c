//! # AI 请求记录实体定义
//!
//! 每次推理调用对应一行，调用开始时创建，随调用进展原地更新

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// AI 请求记录实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ai_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub request_type: String,
    pub status: String,

    // === 输入数据 ===
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    #[sea_orm(column_type = "Text")]
    pub image_urls: String, // JSON: 图片URL数组
    pub model_name: String,
    pub max_tokens: i32,
    pub temperature: f64,

    // === 响应数据 ===
    #[sea_orm(column_type = "Text", nullable)]
    pub response_text: Option<String>,
    pub response_tokens: i32,
    /// 处理耗时（秒）
    pub processing_time: f64,

    // === 元数据 ===
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
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
    #[sea_orm(has_many = "super::product_ai_generations::Entity")]
    ProductAiGenerations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product_ai_generations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductAiGenerations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// === 辅助枚举 ===

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// 商品描述
    ProductDescription,
    /// 图片分析
    ImageAnalysis,
    /// 文本生成
    TextGeneration,
    /// 对话
    #[default]
    Chat,
    /// 商品完整分析（表单自动填充）
    ProductAnalysis,
}

impl RequestType {
    /// 数据库存储值
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductDescription => "product_description",
            Self::ImageAnalysis => "image_analysis",
            Self::TextGeneration => "text_generation",
            Self::Chat => "chat",
            Self::ProductAnalysis => "product_analysis",
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "product_description" => Ok(Self::ProductDescription),
            "image_analysis" => Ok(Self::ImageAnalysis),
            "text_generation" => Ok(Self::TextGeneration),
            "chat" => Ok(Self::Chat),
            "product_analysis" => Ok(Self::ProductAnalysis),
            other => Err(format!("未知的请求类型: {other}")),
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求状态
///
/// `Pending -> Processing -> Completed | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// 待处理
    Pending,
    /// 处理中
    Processing,
    /// 已完成
    Completed,
    /// 失败
    Failed,
}

impl RequestStatus {
    /// 数据库存储值
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// 是否为终态
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("未知的请求状态: {other}")),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Model {
    /// 解析图片URL列表
    pub fn get_image_urls(&self) -> Result<Vec<String>, serde_json::Error> {
        if self.image_urls.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&self.image_urls)
    }

    /// 是否包含图片
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.get_image_urls().is_ok_and(|urls| !urls.is_empty())
    }

    /// 是否为多模态请求（文本 + 图片）
    #[must_use]
    pub fn is_multimodal(&self) -> bool {
        self.has_images() && !self.prompt.is_empty()
    }

    /// 获取请求状态
    #[must_use]
    pub fn get_status(&self) -> Option<RequestStatus> {
        self.status.parse().ok()
    }

    /// 获取请求类型
    #[must_use]
    pub fn get_request_type(&self) -> Option<RequestType> {
        self.request_type.parse().ok()
    }
}
