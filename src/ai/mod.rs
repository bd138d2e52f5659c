//! # AI 模块
//!
//! Gemma 推理服务客户端、商品提示词层以及相关的持久化

pub mod config_store;
pub mod extract;
pub mod generations;
pub mod history;
pub mod payload;
pub mod product;
pub mod prompts;
pub mod service;
pub mod types;
pub mod usage;

pub use generations::GenerationStore;
pub use history::{RequestFilter, RequestHistory};
pub use product::{AutoFillOutcome, ProductAiService};
pub use service::{GemmaService, build_http_client};
pub use types::{GenerateParams, GenerationResult, HealthReport};
pub use usage::UsageRecorder;
