//! # 配置加载测试

use super::{AppConfig, ConfigManager};
use crate::error::AppError;
use serial_test::serial;
use std::io::Write;

const OVERRIDE_VARS: [&str; 7] = [
    "MARKET_AI_CONFIG_PATH",
    "DATABASE_URL",
    "LIGHTNING_AI_ENDPOINT",
    "LIGHTNING_AI_API_KEY",
    "MARKET_AI_MODEL",
    "MARKET_AI_PORT",
    "JWT_SECRET",
];

fn clear_env() {
    for var in OVERRIDE_VARS {
        // SAFETY: 这些测试通过 serial 串行执行
        unsafe { std::env::remove_var(var) };
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.ai.model_name, "google/gemma-3-4b-it");
    assert_eq!(config.ai.max_tokens, 256);
    assert!((config.ai.temperature - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.ai.timeout_seconds, 300);
    assert_eq!(config.ai.config_name, "default");
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.ai.endpoint = "ftp://example.com".to_string();
    assert!(matches!(config.validate(), Err(AppError::Config { .. })));

    let mut config = AppConfig::default();
    config.ai.temperature = 2.5;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.ai.max_tokens = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.auth.jwt_secret.clear();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.server.request_timeout = config.ai.timeout_seconds;
    assert!(matches!(config.validate(), Err(AppError::Config { .. })));
}

#[test]
#[serial]
fn test_load_partial_file_with_env_overrides() {
    clear_env();
    let file = write_config(
        r#"
[server]
port = 9100

[ai]
endpoint = "https://gemma.example.com"
max_tokens = 512
"#,
    );

    // SAFETY: 串行测试
    unsafe {
        std::env::set_var("MARKET_AI_CONFIG_PATH", file.path());
        std::env::set_var("LIGHTNING_AI_API_KEY", "secret-from-env");
        std::env::set_var("MARKET_AI_PORT", "9200");
    }

    let manager = ConfigManager::new().unwrap();
    let config = manager.get_config();
    clear_env();

    assert_eq!(manager.source(), Some(file.path()));
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.ai.endpoint, "https://gemma.example.com");
    assert_eq!(config.ai.max_tokens, 512);
    assert_eq!(config.ai.api_key, "secret-from-env");
    assert_eq!(config.ai.model_name, "google/gemma-3-4b-it");
}

#[test]
#[serial]
fn test_missing_explicit_path_is_error() {
    clear_env();
    // SAFETY: 串行测试
    unsafe { std::env::set_var("MARKET_AI_CONFIG_PATH", "/nonexistent/market-ai.toml") };
    let result = ConfigManager::new();
    clear_env();
    assert!(matches!(result, Err(AppError::Config { .. })));
}

#[test]
#[serial]
fn test_invalid_port_override_is_error() {
    clear_env();
    let file = write_config("[server]\nport = 8000\n");
    // SAFETY: 串行测试
    unsafe { std::env::set_var("MARKET_AI_PORT", "not-a-port") };
    let result = ConfigManager::from_file(file.path());
    clear_env();
    assert!(result.is_err());
}
