//! # 推理调用生命周期集成测试
//!
//! 覆盖请求记录状态流转、使用统计与失败分类

mod common;

use common::ai_defaults;
use common::fixtures::insert_user;
use common::helpers::setup_test_db;
use common::mocks::MockGemmaServer;
use entity::{ai_requests, ai_usage_stats};
use market_ai::ai::types::{GenerateParams, RequestStatus, RequestType};
use market_ai::ai::{GemmaService, build_http_client};
use pretty_assertions::assert_eq;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use std::time::Duration;

async fn gemma_for(db: &Arc<DatabaseConnection>, endpoint: &str) -> GemmaService {
    let client = build_http_client(Duration::from_secs(2)).unwrap();
    GemmaService::new(db.clone(), client, &ai_defaults(endpoint))
        .await
        .unwrap()
}

async fn load_request(db: &DatabaseConnection, id: i32) -> ai_requests::Model {
    ai_requests::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_successful_call_completes_request_and_counts_once() {
    let db = setup_test_db().await;
    let user = insert_user(&db, "ana", false).await;
    let server = MockGemmaServer::start().await;
    server.mock_completion("Una descripción atractiva", 87).await;

    let gemma = gemma_for(&db, &server.uri()).await;
    let params = GenerateParams::new("Describe el producto", RequestType::ProductDescription)
        .with_images(vec!["https://img.example/a.jpg".to_string()])
        .for_user(Some(user.id));

    let result = gemma.generate_response(params).await.unwrap();
    assert!(result.success);
    assert_eq!(result.response.as_deref(), Some("Una descripción atractiva"));
    assert_eq!(result.tokens_used, 87);
    assert_eq!(result.model.as_deref(), Some("google/gemma-3-4b-it"));

    let record = load_request(&db, result.request_id).await;
    assert_eq!(record.get_status(), Some(RequestStatus::Completed));
    assert_eq!(record.response_tokens, 87);
    assert_eq!(record.user_id, Some(user.id));
    assert_eq!(
        record.get_image_urls().unwrap(),
        vec!["https://img.example/a.jpg".to_string()]
    );
    assert!(record.error_message.is_none());

    let stats = ai_usage_stats::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(stats.len(), 1);
    let row = &stats[0];
    assert_eq!(row.user_id, Some(user.id));
    assert_eq!(row.total_requests, 1);
    assert_eq!(row.successful_requests, 1);
    assert_eq!(row.failed_requests, 0);
    assert_eq!(row.total_tokens_used, 87);
    assert_eq!(row.product_description_requests, 1);
    assert_eq!(row.chat_requests, 0);

    let auth = server.received_authorization().await;
    assert_eq!(auth, vec!["Bearer test-api-key".to_string()]);
}

#[tokio::test]
async fn test_request_is_processing_while_endpoint_responds() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server
        .mock_completion_delayed("tarde", 20, Duration::from_millis(800))
        .await;

    let gemma = gemma_for(&db, &server.uri()).await;
    let task = tokio::spawn(async move {
        gemma
            .generate_response(GenerateParams::new("hola", RequestType::Chat))
            .await
    });

    let mut seen_processing = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let rows = ai_requests::Entity::find().all(db.as_ref()).await.unwrap();
        if rows
            .first()
            .is_some_and(|row| row.get_status() == Some(RequestStatus::Processing))
        {
            seen_processing = true;
            break;
        }
    }
    assert!(seen_processing, "request never observed in processing state");

    let result = task.await.unwrap().unwrap();
    assert!(result.success);
    let record = load_request(&db, result.request_id).await;
    assert_eq!(record.get_status(), Some(RequestStatus::Completed));
    assert!(record.processing_time >= 0.8);
}

#[tokio::test]
async fn test_network_failure_marks_request_failed() {
    let db = setup_test_db().await;
    let user = insert_user(&db, "bruno", false).await;
    // 未监听的端口，连接被拒绝
    let gemma = gemma_for(&db, "http://127.0.0.1:9").await;

    let result = gemma
        .generate_response(GenerateParams::new("hola", RequestType::Chat).for_user(Some(user.id)))
        .await
        .unwrap();

    assert!(!result.success);
    let error = result.error.clone().unwrap();
    assert!(error.starts_with("Request error:"), "{error}");
    assert_eq!(result.tokens_used, 0);

    let record = load_request(&db, result.request_id).await;
    assert_eq!(record.get_status(), Some(RequestStatus::Failed));
    assert_eq!(record.error_message.as_deref(), Some(error.as_str()));
    assert!(record.response_text.is_none());

    let stats = ai_usage_stats::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].failed_requests, 1);
    assert_eq!(stats[0].successful_requests, 0);
    assert_eq!(stats[0].total_requests, 1);
    assert_eq!(stats[0].chat_requests, 1);
}

#[tokio::test]
async fn test_http_error_status_is_request_error() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server.mock_completion_status(500, "model crashed").await;

    let gemma = gemma_for(&db, &server.uri()).await;
    let result = gemma
        .generate_response(GenerateParams::new("hola", RequestType::TextGeneration))
        .await
        .unwrap();

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("Request error: HTTP 500"), "{error}");
}

#[tokio::test]
async fn test_response_without_choices_is_unexpected_error() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server
        .mock_completion_json(serde_json::json!({"choices": [], "usage": {"total_tokens": 3}}))
        .await;

    let gemma = gemma_for(&db, &server.uri()).await;
    let result = gemma
        .generate_response(GenerateParams::new("hola", RequestType::Chat))
        .await
        .unwrap();

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("Unexpected error:"), "{error}");
    assert!(error.contains("No valid response from model"), "{error}");

    let record = load_request(&db, result.request_id).await;
    assert_eq!(record.get_status(), Some(RequestStatus::Failed));
}

#[tokio::test]
async fn test_anonymous_calls_share_null_user_row() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server.mock_completion("ok", 12).await;

    let gemma = gemma_for(&db, &server.uri()).await;
    for _ in 0..2 {
        let result = gemma
            .generate_response(GenerateParams::new("hola", RequestType::Chat))
            .await
            .unwrap();
        assert!(result.success);
    }

    let stats = ai_usage_stats::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].user_id, None);
    assert_eq!(stats[0].total_requests, 2);
    assert_eq!(stats[0].total_tokens_used, 24);
}

#[tokio::test]
async fn test_payload_uses_resolved_sampling_values() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server.mock_completion("ok", 12).await;

    let gemma = gemma_for(&db, &server.uri()).await;
    let result = gemma
        .generate_response(
            GenerateParams::new("hola", RequestType::Chat)
                .with_max_tokens(64)
                .with_temperature(0.0),
        )
        .await
        .unwrap();

    let payloads = server.received_payloads().await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["model"], "google/gemma-3-4b-it");
    assert_eq!(payloads[0]["max_tokens"], 64);
    assert_eq!(payloads[0]["temperature"], 0.0);
    assert_eq!(payloads[0]["stream"], false);

    let record = load_request(&db, result.request_id).await;
    assert_eq!(record.max_tokens, 64);
    assert!(record.temperature.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_health_check_reports_status() {
    let db = setup_test_db().await;
    let healthy = MockGemmaServer::start().await;
    healthy.mock_health(200, "LitServe is running").await;

    let report = gemma_for(&db, &healthy.uri()).await.health_check().await;
    assert!(report.is_healthy());
    assert_eq!(report.response.as_deref(), Some("LitServe is running"));
    assert_eq!(report.model.as_deref(), Some("google/gemma-3-4b-it"));

    let db = setup_test_db().await;
    let failing = MockGemmaServer::start().await;
    failing.mock_health(503, "loading").await;

    let report = gemma_for(&db, &failing.uri()).await.health_check().await;
    assert!(!report.is_healthy());
    assert_eq!(report.error.as_deref(), Some("HTTP 503"));
}
