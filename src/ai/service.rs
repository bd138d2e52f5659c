//! # Gemma 推理服务
//!
//! 负责一次推理调用的完整生命周期：
//!
//! 1. 以 `pending` 状态创建 `ai_requests` 记录
//! 2. 切换为 `processing`
//! 3. 构建 OpenAI 兼容载荷并以 Bearer 认证调用远端端点
//! 4. 根据结果将记录置为 `completed` 或 `failed`
//! 5. 更新当日使用统计
//!
//! 记录创建之后的任何失败都转换为 `success = false` 的结果返回。

use chrono::Utc;
use entity::{ai_configurations, ai_requests};
use reqwest::{Client, StatusCode};
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config_store;
use super::payload::{build_payload, completions_url, health_url, resolve_sampling};
use super::types::{
    ChatCompletionResponse, GenerateParams, GenerationResult, HealthReport, RequestStatus,
};
use super::usage::UsageRecorder;
use crate::config::AiConfig;
use crate::error::{AppError, Context, Result};
use crate::{ldebug, lerror, linfo, lwarn, logging::{LogComponent, LogStage}};

/// 构建共享的 HTTP 客户端，单次请求超时由调用方按配置设置
pub fn build_http_client(connect_timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| AppError::server_init_with_source("创建HTTP客户端失败", e))
}

/// Gemma 推理服务
#[derive(Debug, Clone)]
pub struct GemmaService {
    db: Arc<DatabaseConnection>,
    client: Client,
    config: ai_configurations::Model,
    health_timeout: Duration,
    usage: UsageRecorder,
}

impl GemmaService {
    /// 读取（或自动创建）启用的配置并创建服务
    pub async fn new(
        db: Arc<DatabaseConnection>,
        client: Client,
        defaults: &AiConfig,
    ) -> Result<Self> {
        let config = config_store::load_or_create_active(&db, defaults)
            .await
            .context("读取AI配置失败")?;

        Ok(Self {
            usage: UsageRecorder::new(db.clone()),
            db,
            client,
            config,
            health_timeout: Duration::from_secs(defaults.health_timeout_seconds),
        })
    }

    /// 当前使用的配置
    #[must_use]
    pub const fn config(&self) -> &ai_configurations::Model {
        &self.config
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.config.timeout_seconds).unwrap_or(0).max(1))
    }

    /// 生成回复
    ///
    /// 只有在创建请求记录失败时返回 `Err`，其余失败都体现在返回结果中。
    /// 生命周期在独立任务中执行，调用方被取消（超时、客户端断开）时
    /// 记录仍会落到 `completed` 或 `failed`。
    pub async fn generate_response(&self, params: GenerateParams) -> Result<GenerationResult> {
        let service = self.clone();
        tokio::spawn(async move { service.run_generation(params).await })
            .await
            .map_err(|e| AppError::internal_with_source("推理任务异常终止", e))?
    }

    async fn run_generation(&self, params: GenerateParams) -> Result<GenerationResult> {
        let start_time = Instant::now();
        let record = self.create_request_record(&params).await?;
        let request_id = record.id;
        let log_id = format!("ai-{request_id}");

        linfo!(
            log_id,
            LogStage::RequestStart,
            LogComponent::Gemma,
            "generate_start",
            "开始调用推理服务",
            request_type = %params.request_type,
            images = params.image_urls.len(),
            user_id = ?params.user_id
        );

        let record = match self
            .update_record(record.clone(), |active| {
                active.status = Set(RequestStatus::Processing.as_str().to_string());
            })
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                lwarn!(
                    log_id,
                    LogStage::Db,
                    LogComponent::Gemma,
                    "mark_processing_failed",
                    "更新请求状态为processing失败",
                    error = %err
                );
                record
            }
        };

        let outcome = self.call_endpoint(&params, &log_id).await;
        let processing_time = start_time.elapsed().as_secs_f64();

        match outcome {
            Ok((response_text, tokens_used)) => {
                let text = response_text.clone();
                if let Err(err) = self
                    .update_record(record, |active| {
                        active.status = Set(RequestStatus::Completed.as_str().to_string());
                        active.response_text = Set(Some(text));
                        active.response_tokens = Set(tokens_used);
                        active.processing_time = Set(processing_time);
                    })
                    .await
                {
                    lerror!(
                        log_id,
                        LogStage::Db,
                        LogComponent::Gemma,
                        "mark_completed_failed",
                        "保存推理结果失败",
                        error = %err
                    );
                }
                self.record_usage(&log_id, &params, tokens_used, true).await;

                linfo!(
                    log_id,
                    LogStage::Response,
                    LogComponent::Gemma,
                    "generate_completed",
                    "推理调用完成",
                    tokens_used = tokens_used,
                    processing_time = processing_time
                );

                Ok(GenerationResult::completed(
                    request_id,
                    response_text,
                    tokens_used,
                    processing_time,
                    self.config.model_name.clone(),
                ))
            }
            Err(err) => {
                let error_message = err.failure_message();
                let stored_message = error_message.clone();
                if let Err(db_err) = self
                    .update_record(record, |active| {
                        active.status = Set(RequestStatus::Failed.as_str().to_string());
                        active.error_message = Set(Some(stored_message));
                        active.processing_time = Set(processing_time);
                    })
                    .await
                {
                    lerror!(
                        log_id,
                        LogStage::Db,
                        LogComponent::Gemma,
                        "mark_failed_failed",
                        "保存失败状态失败",
                        error = %db_err
                    );
                }
                self.record_usage(&log_id, &params, 0, false).await;

                lerror!(
                    log_id,
                    LogStage::ResponseFailure,
                    LogComponent::Gemma,
                    "generate_failed",
                    &error_message,
                    processing_time = processing_time
                );

                Ok(GenerationResult::failed(
                    request_id,
                    error_message,
                    processing_time,
                ))
            }
        }
    }

    async fn create_request_record(&self, params: &GenerateParams) -> Result<ai_requests::Model> {
        let (max_tokens, temperature) = resolve_sampling(&self.config, params);
        let now = Utc::now().naive_utc();

        let record = ai_requests::ActiveModel {
            user_id: Set(params.user_id),
            request_type: Set(params.request_type.as_str().to_string()),
            status: Set(RequestStatus::Pending.as_str().to_string()),
            prompt: Set(params.prompt.clone()),
            image_urls: Set(serde_json::to_string(&params.image_urls)?),
            model_name: Set(self.config.model_name.clone()),
            max_tokens: Set(max_tokens),
            temperature: Set(temperature),
            response_text: Set(None),
            response_tokens: Set(0),
            processing_time: Set(0.0),
            error_message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        record
            .insert(self.db.as_ref())
            .await
            .context("创建AI请求记录失败")
    }

    async fn update_record<F>(
        &self,
        record: ai_requests::Model,
        apply: F,
    ) -> Result<ai_requests::Model>
    where
        F: FnOnce(&mut ai_requests::ActiveModel),
    {
        let mut active = record.into_active_model();
        apply(&mut active);
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(self.db.as_ref()).await?)
    }

    async fn record_usage(&self, log_id: &str, params: &GenerateParams, tokens: i32, success: bool) {
        if let Err(err) = self
            .usage
            .record(params.user_id, params.request_type, tokens, success)
            .await
        {
            lerror!(
                log_id,
                LogStage::Db,
                LogComponent::Usage,
                "usage_update_failed",
                "更新使用统计失败",
                error = %err
            );
        }
    }

    /// 调用推理端点，返回 (回复文本, token 数)
    async fn call_endpoint(&self, params: &GenerateParams, log_id: &str) -> Result<(String, i32)> {
        let payload = build_payload(&self.config, params);
        let url = completions_url(&self.config.endpoint);
        let timeout = self.request_timeout();

        ldebug!(
            log_id,
            LogStage::ExternalApi,
            LogComponent::Gemma,
            "post_completion",
            &format!("POST {url}"),
            model = %payload.model,
            max_tokens = payload.max_tokens,
            temperature = payload.temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            lwarn!(
                log_id,
                LogStage::ExternalApi,
                LogComponent::Gemma,
                "upstream_status",
                &format!("推理服务返回错误状态: {status}"),
                body = %truncate(&body, 200)
            );
            return Err(AppError::network(format!("HTTP {status} for url ({url})")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        let content = parsed
            .first_content()
            .ok_or_else(|| {
                AppError::ai_provider("No valid response from model", &self.config.endpoint)
            })?
            .to_string();

        Ok((content, parsed.total_tokens()))
    }

    /// 检查推理服务状态，仅 HTTP 200 视为健康
    pub async fn health_check(&self) -> HealthReport {
        let endpoint = self.config.endpoint.clone();
        let result = self
            .client
            .get(health_url(&endpoint))
            .bearer_auth(&self.config.api_key)
            .timeout(self.health_timeout)
            .send()
            .await;

        let report = match result {
            Ok(response) if response.status() == StatusCode::OK => {
                let body = response.text().await.unwrap_or_default();
                HealthReport::healthy(endpoint, self.config.model_name.clone(), body)
            }
            Ok(response) => {
                HealthReport::unhealthy(endpoint, format!("HTTP {}", response.status().as_u16()))
            }
            Err(err) => HealthReport::unhealthy(endpoint, err.to_string()),
        };

        linfo!(
            "system",
            LogStage::HealthCheck,
            LogComponent::Gemma,
            "health_check",
            "推理服务健康检查完成",
            healthy = report.is_healthy()
        );
        report
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> AppError {
    if err.is_timeout() {
        AppError::connection_timeout_with_source(err.to_string(), timeout.as_secs(), err)
    } else {
        AppError::from(err)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
