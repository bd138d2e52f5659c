//! # 测试数据 Fixtures
//!
//! 提供测试用的预设数据，插入失败时直接 panic

use chrono::Utc;
use entity::ai_requests::{RequestStatus, RequestType};
use entity::{ai_configurations, ai_requests, categories, products, users};
use sea_orm::prelude::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// 未落库的 AI 配置，字段取默认值
#[must_use]
pub fn ai_configuration_model(endpoint: &str) -> ai_configurations::Model {
    let now = Utc::now().naive_utc();
    ai_configurations::Model {
        id: 1,
        name: "default".to_string(),
        endpoint: endpoint.to_string(),
        api_key: "gemma3-litserve".to_string(),
        model_name: "google/gemma-3-4b-it".to_string(),
        max_tokens_default: 256,
        temperature_default: 0.7,
        timeout_seconds: 300,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// 插入一个用户
pub async fn insert_user(db: &DatabaseConnection, username: &str, is_staff: bool) -> users::Model {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        is_active: Set(true),
        is_staff: Set(is_staff),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

/// 插入一个分类
pub async fn insert_category(db: &DatabaseConnection, name: &str) -> categories::Model {
    categories::ActiveModel {
        name: Set(name.to_string()),
        description: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert category")
}

/// 插入一个草稿商品（同时创建分类）
pub async fn insert_product(db: &DatabaseConnection, seller_id: i32, title: &str) -> products::Model {
    let category = insert_category(db, &format!("cat-{title}")).await;
    let now = Utc::now().naive_utc();
    products::ActiveModel {
        title: Set(title.to_string()),
        description: Set(String::new()),
        price: Set(Decimal::new(1999, 2)),
        category_id: Set(category.id),
        image: Set(String::new()),
        seller_id: Set(seller_id),
        status: Set(products::ProductStatus::Draft.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert product")
}

/// 插入一条处于指定状态的 AI 请求记录
pub async fn insert_ai_request(
    db: &DatabaseConnection,
    user_id: Option<i32>,
    request_type: RequestType,
    status: RequestStatus,
) -> ai_requests::Model {
    let now = Utc::now().naive_utc();
    let completed = status == RequestStatus::Completed;
    ai_requests::ActiveModel {
        user_id: Set(user_id),
        request_type: Set(request_type.as_str().to_string()),
        status: Set(status.as_str().to_string()),
        prompt: Set("prompt de prueba".to_string()),
        image_urls: Set("[]".to_string()),
        model_name: Set("google/gemma-3-4b-it".to_string()),
        max_tokens: Set(256),
        temperature: Set(0.7),
        response_text: Set(completed.then(|| "respuesta generada".to_string())),
        response_tokens: Set(if completed { 42 } else { 0 }),
        processing_time: Set(0.5),
        error_message: Set((status == RequestStatus::Failed).then(|| "Request error: boom".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert ai request")
}

/// 插入一条启用的 AI 配置
pub async fn insert_ai_configuration(
    db: &DatabaseConnection,
    endpoint: &str,
    timeout_seconds: i32,
) -> ai_configurations::Model {
    let now = Utc::now().naive_utc();
    ai_configurations::ActiveModel {
        name: Set("default".to_string()),
        endpoint: Set(endpoint.to_string()),
        api_key: Set("test-api-key".to_string()),
        model_name: Set("google/gemma-3-4b-it".to_string()),
        max_tokens_default: Set(256),
        temperature_default: Set(0.7),
        timeout_seconds: Set(timeout_seconds),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert ai configuration")
}
