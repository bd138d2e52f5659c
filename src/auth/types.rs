//! # 认证类型定义

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// 用户ID
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 是否为工作人员
    pub is_staff: bool,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
    /// JWT ID
    pub jti: String,
}

impl JwtClaims {
    /// 创建新的 JWT 载荷
    #[must_use]
    pub fn new(
        user_id: i32,
        username: String,
        is_staff: bool,
        expires_in_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            is_staff,
            iat: now,
            exp: now + expires_in_seconds,
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 检查 JWT 是否过期
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// 获取用户ID
    pub fn user_id(&self) -> Result<i32, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// 已认证调用者，由认证中间件注入到请求扩展中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
}
