//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod users;
pub mod categories;
pub mod products;
pub mod ai_requests;
pub mod ai_usage_stats;
pub mod ai_configurations;
pub mod product_ai_generations;

pub use users::Entity as Users;
pub use categories::Entity as Categories;
pub use products::Entity as Products;
pub use ai_requests::Entity as AiRequests;
pub use ai_usage_stats::Entity as AiUsageStats;
pub use ai_configurations::Entity as AiConfigurations;
pub use product_ai_generations::Entity as ProductAiGenerations;
