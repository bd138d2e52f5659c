//! # 请求处理器
//!
//! 各处理器只负责参数提取与校验，业务逻辑在 `crate::ai` 中

pub mod generate;
pub mod generations;
pub mod history;
pub mod product;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use serde_json::{Value, json};

use crate::error::{AppError, Result};

/// Ping
pub async fn ping_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// 把 JSON 提取失败统一转换为 400 校验错误
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text(), None))
}

/// 把查询参数提取失败统一转换为 400 校验错误
pub(crate) fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::validation(rejection.body_text(), None))
}

/// 必填的非空文本字段
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::validation(
            format!("缺少必填字段: {field}"),
            Some(field),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some("hola".into()), "prompt").unwrap(), "hola");
        assert!(matches!(
            required_text(Some("  ".into()), "prompt"),
            Err(AppError::Validation { field: Some(f), .. }) if f == "prompt"
        ));
        assert!(required_text(None, "prompt").is_err());
    }
}
