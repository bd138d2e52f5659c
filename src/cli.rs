//! # 命令行接口
//!
//! `serve`（默认）、`migrate`、`setup-config`、`issue-token`

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::ai::config_store;
use crate::api::{ApiServer, AppState};
use crate::auth::JwtManager;
use crate::config::{AppConfig, ConfigManager};
use crate::database::{check_database_status, init_database_with, run_migrations};
use crate::error::{AppError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 市场 AI 服务
#[derive(Debug, Parser)]
#[command(name = "market-ai", version, about = "Gemma 3 product-content service")]
pub struct Cli {
    /// 配置文件路径，覆盖 `MARKET_AI_CONFIG_PATH`
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// 日志级别
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 子命令
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 执行数据库迁移
    Migrate,
    /// 创建或显示默认的 AI 配置
    SetupConfig,
    /// 为运维签发访问令牌
    IssueToken {
        #[arg(long)]
        user_id: i32,
        #[arg(long)]
        username: String,
        #[arg(long, default_value_t = false)]
        staff: bool,
    },
}

impl Cli {
    /// 加载配置：命令行路径优先，否则走 `ConfigManager::new`
    pub fn load_config(&self) -> Result<AppConfig> {
        let manager = match &self.config {
            Some(path) => ConfigManager::from_file(path)?,
            None => ConfigManager::new()?,
        };
        Ok(manager.get_config())
    }
}

/// 执行命令
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(&config).await,
        Command::SetupConfig => setup_config(&config).await,
        Command::IssueToken {
            user_id,
            username,
            staff,
        } => {
            let token =
                JwtManager::new(&config.auth).generate_access_token(user_id, username, staff)?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let db = init_database_with(&config.database).await?;
    prepare_schema(&db).await?;

    let state = AppState::new(Arc::new(db), Arc::new(config))?;
    ApiServer::new(state).serve().await
}

/// 有待执行的迁移时自动执行
async fn prepare_schema(db: &sea_orm::DatabaseConnection) -> Result<()> {
    let pending = check_database_status(db)
        .await
        .map_err(|e| AppError::database_with_source("检查迁移状态失败", e))?;
    if pending > 0 {
        lwarn!(
            "system",
            LogStage::Startup,
            LogComponent::Database,
            "pending_migrations",
            "存在未执行的迁移，开始执行",
            pending = pending
        );
        run_migrations(db)
            .await
            .map_err(|e| AppError::database_with_source("数据库迁移失败", e))?;
    }
    Ok(())
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let db = init_database_with(&config.database).await?;
    run_migrations(&db)
        .await
        .map_err(|e| AppError::database_with_source("数据库迁移失败", e))?;
    linfo!(
        "system",
        LogStage::Db,
        LogComponent::Database,
        "migrations_applied",
        "数据库迁移完成"
    );
    Ok(())
}

async fn setup_config(config: &AppConfig) -> Result<()> {
    let db = init_database_with(&config.database).await?;
    prepare_schema(&db).await?;

    let (model, created) = config_store::setup_default_config(&db, &config.ai).await?;
    println!("configuration: {}", model.name);
    println!("  endpoint: {}", model.endpoint);
    println!("  model:    {}", model.model_name);
    println!("  active:   {}", model.is_active);
    println!("  created:  {created}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["market-ai"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_issue_token_arguments() {
        let cli = Cli::try_parse_from([
            "market-ai",
            "issue-token",
            "--user-id",
            "7",
            "--username",
            "ana",
            "--staff",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::IssueToken {
                user_id: 7,
                username: "ana".to_string(),
                staff: true,
            })
        );
    }

    #[test]
    fn test_issue_token_requires_user_id() {
        assert!(Cli::try_parse_from(["market-ai", "issue-token", "--username", "ana"]).is_err());
    }
}
