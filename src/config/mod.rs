//! # 配置管理模块
//!
//! 处理应用配置加载、验证和环境变量覆盖

mod app_config;
mod database;
mod manager;

pub use app_config::{AiConfig, AppConfig, AuthConfig, ServerConfig};
pub use database::DatabaseConfig;
pub use manager::ConfigManager;

#[cfg(test)]
#[allow(unsafe_code)]
mod tests;
