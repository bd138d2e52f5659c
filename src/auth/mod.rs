//! # 认证模块
//!
//! 仅负责校验 Bearer JWT 并识别调用者，不提供登录/注册

pub mod jwt;
pub mod types;

pub use jwt::JwtManager;
pub use types::{AuthContext, JwtClaims};
