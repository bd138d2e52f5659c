//! # 认证与超时中间件
//!
//! 可选的 Bearer JWT 认证：无 `Authorization` 头视为匿名调用，
//! 头存在但无效时直接返回 401。解析结果以 [`CurrentUser`] 注入请求扩展。

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;

use super::server::AppState;
use crate::auth::AuthContext;
use crate::error::{AppError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};

/// 当前调用者，`None` 表示匿名
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<AuthContext>);

impl CurrentUser {
    /// 调用者的用户 ID（匿名为 `None`）
    #[must_use]
    pub fn user_id(&self) -> Option<i32> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }

    /// 要求已登录
    pub fn require(&self) -> Result<&AuthContext> {
        self.0
            .as_ref()
            .ok_or_else(|| AppError::auth("需要登录后访问"))
    }

    /// 要求工作人员身份
    pub fn require_staff(&self) -> Result<&AuthContext> {
        let ctx = self.require()?;
        if ctx.is_staff {
            Ok(ctx)
        } else {
            Err(AppError::permission("仅工作人员可访问"))
        }
    }
}

/// 从 `Authorization` 头提取 Bearer Token
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum 可选认证中间件
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    let current = match header {
        None => CurrentUser(None),
        Some(header) => {
            let Some(token) = extract_bearer_token(&header) else {
                return AppError::auth("Authorization 头格式错误").into_response();
            };
            match state.jwt().authenticate(token) {
                Ok(ctx) => {
                    ldebug!(
                        "system",
                        LogStage::Authentication,
                        LogComponent::Auth,
                        "token_verified",
                        "Bearer token 验证通过",
                        user_id = ctx.user_id
                    );
                    CurrentUser(Some(ctx))
                }
                Err(err) => {
                    lwarn!(
                        "system",
                        LogStage::Authentication,
                        LogComponent::Auth,
                        "token_rejected",
                        "Bearer token 验证失败",
                        error = %err
                    );
                    return err.into_response();
                }
            }
        }
    };

    request.extensions_mut().insert(current);
    next.run(request).await
}

/// 整体请求超时
pub async fn request_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = Duration::from_secs(state.config().server.request_timeout.max(1));
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::ConnectionTimeout {
            message: format!("请求处理超过 {} 秒", limit.as_secs()),
            timeout_seconds: limit.as_secs(),
            source: None,
        }
        .into_response(),
    }
}
