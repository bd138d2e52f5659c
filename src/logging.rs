//! # 日志配置模块
//!
//! 初始化 tracing 订阅者，并提供带请求ID、阶段和组件字段的结构化日志宏

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志所处的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    Startup,
    Shutdown,
    Configuration,
    Db,
    RequestStart,
    ExternalApi,
    Response,
    ResponseFailure,
    HealthCheck,
    Authentication,
    Internal,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Db => "db",
            Self::RequestStart => "request_start",
            Self::ExternalApi => "external_api",
            Self::Response => "response",
            Self::ResponseFailure => "response_failure",
            Self::HealthCheck => "health_check",
            Self::Authentication => "authentication",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    Main,
    Config,
    Database,
    ServerSetup,
    Auth,
    Gemma,
    ProductAi,
    Usage,
    Extractor,
    Api,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::ServerSetup => "server_setup",
            Self::Auth => "auth",
            Self::Gemma => "gemma",
            Self::ProductAi => "product_ai",
            Self::Usage => "usage",
            Self::Extractor => "extractor",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构化 info 日志
///
/// `linfo!(request_id, stage, component, operation, description, key = value, ...)`
#[macro_export]
macro_rules! linfo {
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr $(,)?) => {
        ::tracing::info!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            "{}",
            $desc
        )
    };
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr, $($fields:tt)+) => {
        ::tracing::info!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            $($fields)+,
            "{}",
            $desc
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr $(,)?) => {
        ::tracing::warn!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            "{}",
            $desc
        )
    };
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr, $($fields:tt)+) => {
        ::tracing::warn!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            $($fields)+,
            "{}",
            $desc
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr $(,)?) => {
        ::tracing::error!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            "{}",
            $desc
        )
    };
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr, $($fields:tt)+) => {
        ::tracing::error!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            $($fields)+,
            "{}",
            $desc
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr $(,)?) => {
        ::tracing::debug!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            "{}",
            $desc
        )
    };
    ($rid:expr, $stage:expr, $comp:expr, $op:expr, $desc:expr, $($fields:tt)+) => {
        ::tracing::debug!(
            request_id = %$rid,
            stage = %$stage,
            component = %$comp,
            operation = $op,
            $($fields)+,
            "{}",
            $desc
        )
    };
}

/// 初始化优化的日志系统
pub fn init_optimized_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", String::as_str);

    // 默认配置：完全禁止数据库查询的详细日志
    let default_filter = format!(
        "{level},market_ai=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn"
    );

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    // 测试或重复初始化时订阅者可能已存在，此时忽略
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if env::var("RUST_LOG").is_ok_and(|v| {
        v.contains("sqlx::query=info") || v.contains("sqlx::query=debug")
    }) {
        tracing::info!("🔍 SQLx database query logging enabled");
    } else {
        tracing::info!("📋 SQLx database query logging disabled for production performance");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_component_names() {
        assert_eq!(LogStage::ExternalApi.to_string(), "external_api");
        assert_eq!(LogStage::ResponseFailure.as_str(), "response_failure");
        assert_eq!(LogComponent::ProductAi.to_string(), "product_ai");
        assert_eq!(LogComponent::ServerSetup.as_str(), "server_setup");
    }

    #[test]
    fn test_macros_expand_with_and_without_fields() {
        let request_id = "req-1";
        crate::linfo!(
            request_id,
            LogStage::Internal,
            LogComponent::Main,
            "macro_check",
            "plain message"
        );
        crate::lwarn!(
            request_id,
            LogStage::Internal,
            LogComponent::Main,
            "macro_check",
            &format!("formatted {}", 1),
            attempt = 2,
            reason = %"none"
        );
    }
}
