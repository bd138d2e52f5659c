//! 集成测试共用的 fixtures、内存数据库和推理服务 Mock

#![allow(dead_code)]

#[path = "../../src/testing/fixtures.rs"]
pub mod fixtures;
#[path = "../../src/testing/helpers.rs"]
pub mod helpers;
#[path = "../../src/testing/mocks.rs"]
pub mod mocks;

use market_ai::config::AiConfig;

/// 指向 Mock 服务器的 AI 默认配置
pub fn ai_defaults(endpoint: &str) -> AiConfig {
    AiConfig {
        endpoint: endpoint.to_string(),
        api_key: "test-api-key".to_string(),
        timeout_seconds: 5,
        health_timeout_seconds: 2,
        ..AiConfig::default()
    }
}
