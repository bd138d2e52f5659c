//! # 数据库模块
//!
//! 数据库连接和迁移管理

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::{ldebug, lerror, linfo, lwarn, logging::{LogComponent, LogStage}};

/// 初始化数据库连接
///
/// 对 SQLite 文件数据库，会先创建父目录和空文件。
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection> {
    init_database_with(&DatabaseConfig {
        url: database_url.to_string(),
        ..DatabaseConfig::default()
    })
    .await
}

/// 按配置初始化数据库连接
pub async fn init_database_with(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let database_url = config.url.as_str();
    linfo!(
        "system",
        LogStage::Db,
        LogComponent::Database,
        "connect",
        &format!("正在连接数据库: {database_url}")
    );

    if config.is_sqlite() && !config.is_memory_database() {
        ensure_sqlite_file(database_url)?;
    }

    // 内存数据库每个连接都是独立实例，只能使用单连接
    let max_connections = if config.is_memory_database() {
        1
    } else {
        config.max_connections
    };
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);

    let db = Database::connect(options).await.map_err(|e| {
        AppError::database_with_source(format!("数据库连接失败: {database_url}"), e)
    })?;

    linfo!(
        "system",
        LogStage::Db,
        LogComponent::Database,
        "connected",
        "数据库连接成功"
    );
    Ok(db)
}

fn ensure_sqlite_file(database_url: &str) -> Result<()> {
    let raw = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    // 去掉 ?mode=rwc 之类的查询参数
    let db_path = raw.split('?').next().unwrap_or(raw);
    let db_file_path = Path::new(db_path);

    if let Some(parent_dir) = db_file_path.parent()
        && !parent_dir.as_os_str().is_empty()
        && !parent_dir.exists()
    {
        std::fs::create_dir_all(parent_dir).map_err(|e| {
            AppError::database_with_source(
                format!("无法创建数据库目录 {}", parent_dir.display()),
                e,
            )
        })?;
        ldebug!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "create_db_dir",
            &format!("数据库目录创建成功: {}", parent_dir.display())
        );
    }

    if !db_file_path.exists() {
        std::fs::File::create(db_file_path).map_err(|e| {
            AppError::database_with_source(
                format!("无法创建数据库文件 {}", db_file_path.display()),
                e,
            )
        })?;
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "create_db_file",
            &format!("数据库文件创建成功: {}", db_file_path.display())
        );
    }

    Ok(())
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    linfo!(
        "system",
        LogStage::Db,
        LogComponent::Database,
        "migrate_start",
        "开始运行数据库迁移..."
    );

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            linfo!(
                "system",
                LogStage::Db,
                LogComponent::Database,
                "migrate_done",
                "数据库迁移完成"
            );
            Ok(())
        }
        Err(e) => {
            lerror!(
                "system",
                LogStage::Db,
                LogComponent::Database,
                "migrate_failed",
                &format!("数据库迁移失败: {e}")
            );
            Err(e)
        }
    }
}

/// 检查数据库状态，返回待应用的迁移数量
pub async fn check_database_status(db: &DatabaseConnection) -> std::result::Result<usize, DbErr> {
    let pending = ::migration::Migrator::get_pending_migrations(db).await?;

    if pending.is_empty() {
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "status",
            "所有迁移都已应用"
        );
    } else {
        lwarn!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "status",
            &format!("有 {} 个待应用的迁移", pending.len())
        );
    }

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_migrations() {
        let db = init_database("sqlite::memory:").await.unwrap();
        assert!(check_database_status(&db).await.unwrap() > 0);

        run_migrations(&db).await.unwrap();
        assert_eq!(check_database_status(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("market.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let db = init_database(&url).await.unwrap();
        run_migrations(&db).await.unwrap();
        assert!(db_path.exists());
    }
}
