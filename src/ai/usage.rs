//! # 每日使用统计
//!
//! 每个 (用户, UTC日期) 一行，计数通过 `col = col + n` 原子递增

use chrono::{Days, NaiveDate, Utc};
use entity::ai_usage_stats::{self, Column};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;

use super::types::RequestType;
use crate::error::Result;
use crate::{ldebug, logging::{LogComponent, LogStage}};

/// 统计汇总中的合计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageTotals {
    pub total_requests: i64,
    pub successful_requests: i64,
    pub total_tokens_used: i64,
    /// 成功率（百分比）
    pub success_rate: f64,
}

/// 最近 N 天的使用统计
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub stats: Vec<ai_usage_stats::Model>,
    pub totals: UsageTotals,
    pub period_days: u32,
}

/// 使用统计记录器
#[derive(Debug, Clone)]
pub struct UsageRecorder {
    db: Arc<DatabaseConnection>,
}

fn user_condition(user_id: Option<i32>) -> Condition {
    match user_id {
        Some(id) => Condition::all().add(Column::UserId.eq(id)),
        None => Condition::all().add(Column::UserId.is_null()),
    }
}

impl UsageRecorder {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 记录一次终态调用
    pub async fn record(
        &self,
        user_id: Option<i32>,
        request_type: RequestType,
        tokens_used: i32,
        success: bool,
    ) -> Result<()> {
        let today = Utc::now().date_naive();
        let row_id = self.find_or_create_row(user_id, today).await?;

        let outcome_column = if success {
            Column::SuccessfulRequests
        } else {
            Column::FailedRequests
        };
        let type_column = Column::for_request_type(request_type);

        ai_usage_stats::Entity::update_many()
            .col_expr(Column::TotalRequests, Expr::col(Column::TotalRequests).add(1))
            .col_expr(
                Column::TotalTokensUsed,
                Expr::col(Column::TotalTokensUsed).add(tokens_used),
            )
            .col_expr(outcome_column, Expr::col(outcome_column).add(1))
            .col_expr(type_column, Expr::col(type_column).add(1))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(Column::Id.eq(row_id))
            .exec(self.db.as_ref())
            .await?;

        ldebug!(
            "system",
            LogStage::Db,
            LogComponent::Usage,
            "usage_recorded",
            "使用统计已更新",
            user_id = ?user_id,
            request_type = %request_type,
            tokens_used = tokens_used,
            success = success
        );
        Ok(())
    }

    async fn find_or_create_row(&self, user_id: Option<i32>, date: NaiveDate) -> Result<i32> {
        if let Some(row) = self.find_row(user_id, date).await? {
            return Ok(row.id);
        }

        let now = Utc::now().naive_utc();
        let row = ai_usage_stats::ActiveModel {
            user_id: Set(user_id),
            date: Set(date),
            total_requests: Set(0),
            successful_requests: Set(0),
            failed_requests: Set(0),
            total_tokens_used: Set(0),
            product_description_requests: Set(0),
            image_analysis_requests: Set(0),
            text_generation_requests: Set(0),
            chat_requests: Set(0),
            product_analysis_requests: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match row.insert(self.db.as_ref()).await {
            Ok(model) => Ok(model.id),
            // 并发请求可能已先插入同一行
            Err(err) => match self.find_row(user_id, date).await? {
                Some(existing) => Ok(existing.id),
                None => Err(err.into()),
            },
        }
    }

    async fn find_row(
        &self,
        user_id: Option<i32>,
        date: NaiveDate,
    ) -> Result<Option<ai_usage_stats::Model>> {
        Ok(ai_usage_stats::Entity::find()
            .filter(user_condition(user_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::Id)
            .one(self.db.as_ref())
            .await?)
    }

    /// 最近 `days` 天（含今天往前 `days` 天）的统计，按日期倒序
    pub async fn summary(&self, user_id: Option<i32>, days: u32) -> Result<UsageSummary> {
        let today = Utc::now().date_naive();
        let start_date = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);

        let stats = ai_usage_stats::Entity::find()
            .filter(user_condition(user_id))
            .filter(Column::Date.gte(start_date))
            .order_by_desc(Column::Date)
            .all(self.db.as_ref())
            .await?;

        let total_requests: i64 = stats.iter().map(|s| i64::from(s.total_requests)).sum();
        let successful_requests: i64 = stats
            .iter()
            .map(|s| i64::from(s.successful_requests))
            .sum();
        let total_tokens_used: i64 = stats.iter().map(|s| i64::from(s.total_tokens_used)).sum();

        #[allow(clippy::cast_precision_loss)]
        let success_rate = if total_requests > 0 {
            successful_requests as f64 / total_requests as f64 * 100.0
        } else {
            0.0
        };

        Ok(UsageSummary {
            stats,
            totals: UsageTotals {
                total_requests,
                successful_requests,
                total_tokens_used,
                success_rate,
            },
            period_days: days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::insert_user;
    use crate::testing::helpers::setup_test_db;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_record_success_and_failure_share_one_row() {
        let db = setup_test_db().await;
        let user = insert_user(&db, "ana", false).await;
        let recorder = UsageRecorder::new(db.clone());

        recorder
            .record(Some(user.id), RequestType::ProductDescription, 120, true)
            .await
            .unwrap();
        recorder
            .record(Some(user.id), RequestType::ImageAnalysis, 0, false)
            .await
            .unwrap();

        let rows = ai_usage_stats::Entity::find().all(db.as_ref()).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.user_id, Some(user.id));
        assert_eq!(row.total_requests, 2);
        assert_eq!(row.successful_requests, 1);
        assert_eq!(row.failed_requests, 1);
        assert_eq!(row.total_tokens_used, 120);
        assert_eq!(row.product_description_requests, 1);
        assert_eq!(row.image_analysis_requests, 1);
        assert_eq!(row.chat_requests, 0);
    }

    #[tokio::test]
    async fn test_anonymous_usage_is_separate_from_users() {
        let db = setup_test_db().await;
        let user = insert_user(&db, "luis", false).await;
        let recorder = UsageRecorder::new(db.clone());

        recorder.record(None, RequestType::Chat, 10, true).await.unwrap();
        recorder.record(None, RequestType::Chat, 5, true).await.unwrap();
        recorder
            .record(Some(user.id), RequestType::ProductAnalysis, 7, true)
            .await
            .unwrap();

        let anonymous = recorder.summary(None, 30).await.unwrap();
        assert_eq!(anonymous.stats.len(), 1);
        assert_eq!(anonymous.stats[0].chat_requests, 2);
        assert_eq!(anonymous.totals.total_tokens_used, 15);

        let personal = recorder.summary(Some(user.id), 30).await.unwrap();
        assert_eq!(personal.stats[0].product_analysis_requests, 1);
    }

    #[tokio::test]
    async fn test_summary_window_and_totals() {
        let db = setup_test_db().await;
        let user = insert_user(&db, "eva", false).await;
        let today = Utc::now().date_naive();
        let now = Utc::now().naive_utc();

        for (offset, total, ok) in [(0_u64, 4, 3), (5, 6, 3), (40, 100, 100)] {
            ai_usage_stats::ActiveModel {
                user_id: Set(Some(user.id)),
                date: Set(today - Days::new(offset)),
                total_requests: Set(total),
                successful_requests: Set(ok),
                failed_requests: Set(total - ok),
                total_tokens_used: Set(total * 10),
                product_description_requests: Set(0),
                image_analysis_requests: Set(0),
                text_generation_requests: Set(0),
                chat_requests: Set(total),
                product_analysis_requests: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db.as_ref())
            .await
            .unwrap();
        }

        let summary = UsageRecorder::new(db.clone()).summary(Some(user.id), 30).await.unwrap();
        assert_eq!(summary.period_days, 30);
        assert_eq!(summary.stats.len(), 2);
        assert_eq!(summary.stats[0].date, today);
        assert_eq!(
            summary.totals,
            UsageTotals {
                total_requests: 10,
                successful_requests: 6,
                total_tokens_used: 100,
                success_rate: 60.0,
            }
        );
    }
}
