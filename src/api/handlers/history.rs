//! # 历史、统计与配置处理器
//!
//! 这些接口都要求登录，配置接口仅限工作人员

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::response::Response;
use chrono::NaiveDateTime;
use entity::ai_configurations;
use serde::{Deserialize, Serialize};

use super::query_params;
use crate::ai::RequestFilter;
use crate::ai::config_store;
use crate::ai::types::{parse_request_status, parse_request_type};
use crate::api::middleware::CurrentUser;
use crate::api::response::success;
use crate::api::server::AppState;
use crate::error::{AppError, Result};

/// 统计接口默认天数
pub const DEFAULT_STATS_DAYS: u32 = 30;

/// 历史查询参数
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub request_type: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
}

impl HistoryQuery {
    /// 解析过滤条件，空字符串视为未设置
    pub fn filter(&self) -> Result<RequestFilter> {
        let request_type = match self.request_type.as_deref() {
            Some(value) if !value.is_empty() => Some(parse_request_type(value)?),
            _ => None,
        };
        let status = match self.status.as_deref() {
            Some(value) if !value.is_empty() => Some(parse_request_status(value)?),
            _ => None,
        };
        Ok(RequestFilter {
            request_type,
            status,
        })
    }
}

/// 用户的请求历史
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Response> {
    let ctx = user.require()?;
    let query = query_params(query)?;
    let filter = query.filter()?;

    let page = state
        .history()
        .list_for_user(ctx.user_id, filter, query.page.unwrap_or(1))
        .await?;
    Ok(success(page))
}

/// 单条请求详情
pub async fn get_request(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(request_id): Path<i32>,
) -> Result<Response> {
    let ctx = user.require()?;
    let request = state.history().find_for_user(ctx.user_id, request_id).await?;
    Ok(success(request))
}

/// 统计查询参数
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

/// 用户的使用统计汇总
pub async fn usage_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    query: std::result::Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Response> {
    let ctx = user.require()?;
    let days = query_params(query)?.days.unwrap_or(DEFAULT_STATS_DAYS);
    let summary = state.usage().summary(Some(ctx.user_id), days).await?;
    Ok(success(summary))
}

/// 对外展示的 AI 配置，API Key 已脱敏
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigView {
    pub id: i32,
    pub name: String,
    pub endpoint: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens_default: i32,
    pub temperature_default: f64,
    pub timeout_seconds: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ai_configurations::Model> for ConfigView {
    fn from(model: ai_configurations::Model) -> Self {
        Self {
            api_key: model.masked_api_key(),
            id: model.id,
            name: model.name,
            endpoint: model.endpoint,
            model_name: model.model_name,
            max_tokens_default: model.max_tokens_default,
            temperature_default: model.temperature_default,
            timeout_seconds: model.timeout_seconds,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 当前启用的 AI 配置（仅工作人员）
pub async fn active_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response> {
    user.require_staff()?;
    let config = config_store::find_active(state.db())
        .await?
        .ok_or_else(|| AppError::not_found("ai_configuration", "active"))?;
    Ok(success(ConfigView::from(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::{RequestStatus, RequestType};
    use crate::testing::fixtures::ai_configuration_model;

    #[test]
    fn test_history_query_filter() {
        let query = HistoryQuery {
            request_type: Some("image_analysis".into()),
            status: Some(String::new()),
            page: None,
        };
        assert_eq!(
            query.filter().unwrap(),
            RequestFilter {
                request_type: Some(RequestType::ImageAnalysis),
                status: None,
            }
        );

        let bad = HistoryQuery {
            status: Some("done".into()),
            ..HistoryQuery::default()
        };
        assert!(bad.filter().is_err());

        let completed = HistoryQuery {
            status: Some("completed".into()),
            ..HistoryQuery::default()
        };
        assert_eq!(
            completed.filter().unwrap().status,
            Some(RequestStatus::Completed)
        );
    }

    #[test]
    fn test_config_view_masks_key() {
        let view = ConfigView::from(ai_configuration_model("http://gemma.local"));
        assert_eq!(view.api_key, "gemm****erve");
        assert_eq!(view.model_name, "google/gemma-3-4b-it");
    }
}
