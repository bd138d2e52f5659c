//! # 配置管理器
//!
//! 加载 TOML 配置文件并应用环境变量覆盖

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::{linfo, lwarn, logging::{LogComponent, LogStage}};

use super::AppConfig;

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "MARKET_AI_CONFIG_PATH";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 优先使用 `MARKET_AI_CONFIG_PATH`，否则读取 `config/config.{RUST_ENV}.toml`。
    /// 默认路径不存在时回退到内置默认配置。
    pub fn new() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let config_file = PathBuf::from(format!("config/config.{env_name}.toml"));
        if config_file.exists() {
            return Self::from_file(config_file);
        }

        lwarn!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_file_missing",
            &format!("配置文件不存在，使用默认配置: {}", config_file.display())
        );
        Self::from_config(AppConfig::default(), None)
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = Self::load_config_file(config_path)?;
        Self::from_config(config, Some(config_path.to_path_buf()))
    }

    fn from_config(mut config: AppConfig, source: Option<PathBuf>) -> Result<Self> {
        let applied = Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            "配置加载完成",
            source = ?source,
            env_overrides = applied
        );

        Ok(Self { config, source })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> AppConfig {
        self.config.clone()
    }

    /// 配置来源文件
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(AppError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            AppError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 应用环境变量覆盖，返回生效的覆盖数量
    fn apply_env_overrides(config: &mut AppConfig) -> Result<usize> {
        let mut applied = 0;

        if let Ok(value) = env::var("DATABASE_URL") {
            config.database.url = value;
            applied += 1;
        }
        if let Ok(value) = env::var("LIGHTNING_AI_ENDPOINT") {
            config.ai.endpoint = value;
            applied += 1;
        }
        if let Ok(value) = env::var("LIGHTNING_AI_API_KEY") {
            config.ai.api_key = value;
            applied += 1;
        }
        if let Ok(value) = env::var("MARKET_AI_MODEL") {
            config.ai.model_name = value;
            applied += 1;
        }
        if let Ok(value) = env::var("MARKET_AI_PORT") {
            config.server.port = value.parse().map_err(|e| {
                AppError::config_with_source(format!("无效的端口号: {value}"), e)
            })?;
            applied += 1;
        }
        if let Ok(value) = env::var("JWT_SECRET") {
            config.auth.jwt_secret = value;
            applied += 1;
        }

        Ok(applied)
    }
}
