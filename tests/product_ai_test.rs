//! # 商品提示词层集成测试

mod common;

use common::ai_defaults;
use common::helpers::setup_test_db;
use common::mocks::MockGemmaServer;
use entity::ai_requests;
use market_ai::ai::product::AUTO_FILL_PARSE_ERROR;
use market_ai::ai::types::RequestType;
use market_ai::ai::{AutoFillOutcome, GemmaService, ProductAiService, build_http_client};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use std::time::Duration;

async fn product_ai(db: &Arc<DatabaseConnection>, endpoint: &str) -> ProductAiService {
    let client = build_http_client(Duration::from_secs(2)).unwrap();
    let gemma = GemmaService::new(db.clone(), client, &ai_defaults(endpoint))
        .await
        .unwrap();
    ProductAiService::new(gemma)
}

async fn only_request(db: &DatabaseConnection) -> ai_requests::Model {
    let mut rows = ai_requests::Entity::find().all(db).await.unwrap();
    assert_eq!(rows.len(), 1);
    rows.remove(0)
}

#[rstest]
#[case::description("description", 300, 0.7, RequestType::ProductDescription)]
#[case::title("title", 100, 0.8, RequestType::TextGeneration)]
#[case::tags("tags", 150, 0.6, RequestType::TextGeneration)]
#[case::image("image", 400, 0.7, RequestType::ImageAnalysis)]
#[tokio::test]
async fn test_operation_sampling_and_type(
    #[case] operation: &str,
    #[case] max_tokens: i32,
    #[case] temperature: f64,
    #[case] request_type: RequestType,
) {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server.mock_completion("texto generado", 30).await;
    let service = product_ai(&db, &server.uri()).await;
    let images = vec!["https://img.example/zapato.jpg".to_string()];

    let result = match operation {
        "description" => service
            .generate_description("Zapatillas", images, Some("Deportes"), None)
            .await
            .unwrap(),
        "title" => service
            .generate_title("Zapatillas ligeras para correr", images, None, None)
            .await
            .unwrap(),
        "tags" => service
            .suggest_tags("Zapatillas", "Ligeras para correr", images, None, None)
            .await
            .unwrap(),
        _ => service
            .analyze_image("https://img.example/zapato.jpg", Some("Zapatillas"), None)
            .await
            .unwrap(),
    };
    assert!(result.success);

    let record = only_request(&db).await;
    assert_eq!(record.max_tokens, max_tokens);
    assert!((record.temperature - temperature).abs() < 1e-9);
    assert_eq!(record.get_request_type(), Some(request_type));

    let payloads = server.received_payloads().await;
    let content = payloads[0]["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["type"], "text");
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(
        content[1]["image_url"]["url"],
        "https://img.example/zapato.jpg"
    );
}

#[tokio::test]
async fn test_auto_fill_parses_fenced_json() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    let reply = "Aquí tienes:\n```json\n{\"title\": \"Lámpara\", \"category\": \"Hogar\", \"price\": 25}\n```";
    server.mock_completion(reply, 120).await;

    let outcome = product_ai(&db, &server.uri())
        .await
        .analyze_product_complete(vec!["https://img.example/l.jpg".to_string()], None)
        .await
        .unwrap();

    assert!(outcome.is_success());
    match outcome {
        AutoFillOutcome::Parsed { data, request_id, .. } => {
            assert_eq!(data["title"], "Lámpara");
            assert_eq!(data["price"], 25);
            let record = only_request(&db).await;
            assert_eq!(record.id, request_id);
            assert_eq!(record.max_tokens, 500);
            assert_eq!(record.get_request_type(), Some(RequestType::ProductAnalysis));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_auto_fill_keeps_raw_text_when_unparseable() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server
        .mock_completion("No puedo identificar el producto", 15)
        .await;

    let outcome = product_ai(&db, &server.uri())
        .await
        .analyze_product_complete(vec!["https://img.example/x.jpg".to_string()], None)
        .await
        .unwrap();

    assert!(!outcome.is_success());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], AUTO_FILL_PARSE_ERROR);
    assert_eq!(json["raw_response"], "No puedo identificar el producto");
    assert_eq!(json["request_id"], outcome.request_id());
}

#[tokio::test]
async fn test_auto_fill_passes_through_call_failure() {
    let db = setup_test_db().await;
    let server = MockGemmaServer::start().await;
    server.mock_completion_status(502, "bad gateway").await;

    let outcome = product_ai(&db, &server.uri())
        .await
        .analyze_product_complete(vec!["https://img.example/x.jpg".to_string()], None)
        .await
        .unwrap();

    match outcome {
        AutoFillOutcome::Failed(result) => {
            assert!(!result.success);
            assert!(result.error.unwrap().starts_with("Request error:"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
