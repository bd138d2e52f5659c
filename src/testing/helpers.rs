//! # 测试辅助函数
//!
//! 提供通用的测试工具和辅助函数

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::{Arc, Once};
use tracing::Level;

static INIT: Once = Once::new();

/// 初始化测试日志
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 创建已迁移的内存数据库
///
/// # Panics
///
/// 连接或迁移失败时 panic，仅用于测试
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    init_test_logging();
    // 内存库每个连接各自独立，只保留一个连接
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect sqlite::memory:");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    Arc::new(db)
}
