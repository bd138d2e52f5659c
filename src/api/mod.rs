//! # HTTP 接口模块
//!
//! 基于 axum 的 `/api/ai` 接口：服务器、路由、响应格式、认证中间件和处理器

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use middleware::CurrentUser;
pub use server::{ApiServer, AppState, build_router};
