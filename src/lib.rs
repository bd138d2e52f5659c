//! # Market AI
//!
//! 电商平台的 Gemma 3 辅助模块：商品描述、标题、标签生成与图片分析

pub mod ai;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod testing;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, Result};
