//! # 请求历史查询

use chrono::NaiveDateTime;
use entity::ai_requests::{self, Column};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use std::sync::Arc;

use super::types::{RequestStatus, RequestType};
use crate::error::{AppError, Result};
use crate::ensure_validation;

/// 每页条数
pub const PAGE_SIZE: u64 = 20;

/// 历史查询过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub request_type: Option<RequestType>,
    pub status: Option<RequestStatus>,
}

/// 对外展示的请求记录，图片列表已解析
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRequestView {
    pub id: i32,
    pub user_id: Option<i32>,
    pub request_type: String,
    pub status: String,
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub model_name: String,
    pub max_tokens: i32,
    pub temperature: f64,
    pub response_text: Option<String>,
    pub response_tokens: i32,
    pub processing_time: f64,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ai_requests::Model> for AiRequestView {
    fn from(model: ai_requests::Model) -> Self {
        Self {
            image_urls: model.get_image_urls().unwrap_or_default(),
            id: model.id,
            user_id: model.user_id,
            request_type: model.request_type,
            status: model.status,
            prompt: model.prompt,
            model_name: model.model_name,
            max_tokens: model.max_tokens,
            temperature: model.temperature,
            response_text: model.response_text,
            response_tokens: model.response_tokens,
            processing_time: model.processing_time,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 一页历史记录
#[derive(Debug, Clone, Serialize)]
pub struct RequestPage {
    pub requests: Vec<AiRequestView>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// 用户请求历史
#[derive(Debug, Clone)]
pub struct RequestHistory {
    db: Arc<DatabaseConnection>,
}

impl RequestHistory {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 按时间倒序分页列出用户的请求，页码从 1 开始
    pub async fn list_for_user(
        &self,
        user_id: i32,
        filter: RequestFilter,
        page: u64,
    ) -> Result<RequestPage> {
        ensure_validation!(page >= 1, "page", "页码必须从1开始: {}", page);

        let mut query = ai_requests::Entity::find().filter(Column::UserId.eq(user_id));
        if let Some(request_type) = filter.request_type {
            query = query.filter(Column::RequestType.eq(request_type.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(self.db.as_ref(), PAGE_SIZE);
        let total = paginator.num_items().await?;
        let requests = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(AiRequestView::from)
            .collect();

        Ok(RequestPage {
            requests,
            total,
            page,
            page_size: PAGE_SIZE,
        })
    }

    /// 查询用户自己的单条请求，其他用户的记录视为不存在
    pub async fn find_for_user(&self, user_id: i32, request_id: i32) -> Result<AiRequestView> {
        ai_requests::Entity::find_by_id(request_id)
            .filter(Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .map(AiRequestView::from)
            .ok_or_else(|| AppError::not_found("ai_request", request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{insert_ai_request, insert_user};
    use crate::testing::helpers::setup_test_db;

    #[tokio::test]
    async fn test_pagination_and_filters() {
        let db = setup_test_db().await;
        let owner = insert_user(&db, "owner", false).await;
        let other = insert_user(&db, "other", false).await;

        for i in 0..25 {
            let status = if i % 5 == 0 {
                RequestStatus::Failed
            } else {
                RequestStatus::Completed
            };
            insert_ai_request(&db, Some(owner.id), RequestType::Chat, status).await;
        }
        insert_ai_request(&db, Some(owner.id), RequestType::ImageAnalysis, RequestStatus::Completed).await;
        insert_ai_request(&db, Some(other.id), RequestType::Chat, RequestStatus::Completed).await;

        let history = RequestHistory::new(db.clone());
        let first = history
            .list_for_user(owner.id, RequestFilter::default(), 1)
            .await
            .unwrap();
        assert_eq!(first.total, 26);
        assert_eq!(first.requests.len(), 20);
        assert_eq!(first.page_size, 20);
        assert!(first.requests[0].id > first.requests[19].id);

        let second = history
            .list_for_user(owner.id, RequestFilter::default(), 2)
            .await
            .unwrap();
        assert_eq!(second.requests.len(), 6);

        let failed = history
            .list_for_user(
                owner.id,
                RequestFilter {
                    request_type: Some(RequestType::Chat),
                    status: Some(RequestStatus::Failed),
                },
                1,
            )
            .await
            .unwrap();
        assert_eq!(failed.total, 5);

        assert!(history.list_for_user(owner.id, RequestFilter::default(), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_find_for_user_hides_other_users() {
        let db = setup_test_db().await;
        let owner = insert_user(&db, "owner", false).await;
        let other = insert_user(&db, "other", false).await;
        let request =
            insert_ai_request(&db, Some(owner.id), RequestType::Chat, RequestStatus::Completed).await;

        let history = RequestHistory::new(db.clone());
        assert_eq!(history.find_for_user(owner.id, request.id).await.unwrap().id, request.id);
        assert!(matches!(
            history.find_for_user(other.id, request.id).await,
            Err(AppError::NotFound { .. })
        ));
    }
}
