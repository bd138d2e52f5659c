//! # 推理服务配置存储
//!
//! `ai_configurations` 表的读取与自动创建

use chrono::Utc;
use entity::ai_configurations;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::config::AiConfig;
use crate::error::{AppError, Context, Result};
use crate::{linfo, logging::{LogComponent, LogStage}};

/// 当前启用的配置（按 id 取第一条）
pub async fn find_active(db: &DatabaseConnection) -> Result<Option<ai_configurations::Model>> {
    Ok(ai_configurations::Entity::find()
        .filter(ai_configurations::Column::IsActive.eq(true))
        .order_by_asc(ai_configurations::Column::Id)
        .one(db)
        .await?)
}

/// 读取启用的配置，不存在时按默认值创建
///
/// 默认名称的记录已存在但被停用时，插入会因唯一约束失败并返回错误
pub async fn load_or_create_active(
    db: &DatabaseConnection,
    defaults: &AiConfig,
) -> Result<ai_configurations::Model> {
    if let Some(config) = find_active(db).await? {
        return Ok(config);
    }

    let created = insert_default(db, defaults)
        .await
        .context("自动创建默认AI配置失败")?;
    linfo!(
        "system",
        LogStage::Configuration,
        LogComponent::Config,
        "ai_config_created",
        &format!("已创建默认AI配置: {}", created.name),
        endpoint = %created.endpoint,
        model = %created.model_name
    );
    Ok(created)
}

/// 按名称获取或创建默认配置，返回 (配置, 是否新建)
pub async fn setup_default_config(
    db: &DatabaseConnection,
    defaults: &AiConfig,
) -> Result<(ai_configurations::Model, bool)> {
    let existing = ai_configurations::Entity::find()
        .filter(ai_configurations::Column::Name.eq(defaults.config_name.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(config) => Ok((config, false)),
        None => Ok((insert_default(db, defaults).await?, true)),
    }
}

async fn insert_default(
    db: &DatabaseConnection,
    defaults: &AiConfig,
) -> Result<ai_configurations::Model> {
    let now = Utc::now().naive_utc();
    let timeout_seconds = i32::try_from(defaults.timeout_seconds)
        .map_err(|e| AppError::config_with_source("ai.timeout_seconds 过大", e))?;

    let model = ai_configurations::ActiveModel {
        name: Set(defaults.config_name.clone()),
        endpoint: Set(defaults.endpoint.clone()),
        api_key: Set(defaults.api_key.clone()),
        model_name: Set(defaults.model_name.clone()),
        max_tokens_default: Set(defaults.max_tokens),
        temperature_default: Set(defaults.temperature),
        timeout_seconds: Set(timeout_seconds),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::helpers::setup_test_db;

    #[tokio::test]
    async fn test_auto_create_when_absent() {
        let db = setup_test_db().await;
        assert!(find_active(&db).await.unwrap().is_none());

        let defaults = AiConfig::default();
        let config = load_or_create_active(&db, &defaults).await.unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.model_name, "google/gemma-3-4b-it");
        assert_eq!(config.max_tokens_default, 256);
        assert_eq!(config.timeout_seconds, 300);
        assert!(config.is_active);

        // 第二次读取不会重复创建
        let again = load_or_create_active(&db, &defaults).await.unwrap();
        assert_eq!(again.id, config.id);
    }

    #[tokio::test]
    async fn test_inactive_default_conflicts() {
        let db = setup_test_db().await;
        let (config, created) = setup_default_config(&db, &AiConfig::default())
            .await
            .unwrap();
        assert!(created);

        let mut active: ai_configurations::ActiveModel = config.into();
        active.is_active = Set(false);
        active.update(&*db).await.unwrap();

        assert!(load_or_create_active(&db, &AiConfig::default()).await.is_err());

        let (_, created) = setup_default_config(&db, &AiConfig::default())
            .await
            .unwrap();
        assert!(!created);
    }
}
