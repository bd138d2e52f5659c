//! # 应用配置结构定义

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 推理服务配置，也是自动创建 `ai_configurations` 记录时的默认值
    pub ai: AiConfig,
    /// JWT 校验配置
    pub auth: AuthConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// 请求体上限（字节），图片上传也受此限制
    pub max_request_size: usize,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            max_request_size: 10 * 1024 * 1024,
            request_timeout: 330,
        }
    }
}

impl ServerConfig {
    /// 解析监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                AppError::config_with_source(
                    format!("无效的监听地址: {}:{}", self.bind_address, self.port),
                    e,
                )
            })
    }
}

/// 推理服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// 自动创建的配置记录名称
    pub config_name: String,
    pub endpoint: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens: i32,
    pub temperature: f64,
    /// 单次推理请求超时（秒）
    pub timeout_seconds: u64,
    /// 健康检查超时（秒）
    pub health_timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            config_name: "default".to_string(),
            endpoint: "http://localhost:8000".to_string(),
            api_key: "gemma3-litserve".to_string(),
            model_name: "google/gemma-3-4b-it".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            timeout_seconds: 300,
            health_timeout_seconds: 10,
        }
    }
}

/// JWT 校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// 签发令牌的有效期（秒）
    pub jwt_expires_in: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "market-ai-dev-secret-change-me".to_string(),
            jwt_expires_in: 3600,
            issuer: "market-ai".to_string(),
            audience: "market-ai-api".to_string(),
        }
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::config("服务端口必须大于0"));
        }

        if self.database.url.is_empty() {
            return Err(AppError::config("数据库URL不能为空"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config("数据库最大连接数必须大于0"));
        }

        let endpoint = url::Url::parse(&self.ai.endpoint).map_err(|e| {
            AppError::config_with_source(format!("无效的推理服务地址: {}", self.ai.endpoint), e)
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "推理服务地址必须是 http(s): {}",
                self.ai.endpoint
            )));
        }
        if self.ai.max_tokens <= 0 {
            return Err(AppError::config("ai.max_tokens 必须大于0"));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(AppError::config(format!(
                "ai.temperature 超出范围 [0, 2]: {}",
                self.ai.temperature
            )));
        }
        if self.ai.timeout_seconds == 0 {
            return Err(AppError::config("ai.timeout_seconds 必须大于0"));
        }
        if self.server.request_timeout <= self.ai.timeout_seconds {
            return Err(AppError::config(format!(
                "server.request_timeout ({}) 必须大于 ai.timeout_seconds ({})",
                self.server.request_timeout, self.ai.timeout_seconds
            )));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::config("JWT密钥不能为空"));
        }

        Ok(())
    }
}
