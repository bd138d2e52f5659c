//! # 路由配置
//!
//! 定义 `/api/ai` 下的全部路由

use axum::Router;
use axum::routing::{get, post};

use super::handlers::{generate, generations, history, product};
use super::middleware::optional_auth;
use super::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 推理与健康检查
        .route("/generate/", post(generate::generate_handler))
        .route("/health/", get(generate::health_handler))
        .route("/analyze-product/", post(generate::analyze_product_handler))
        // 商品提示词
        .nest("/product", product_routes())
        // 历史、统计与配置
        .route("/requests/", get(history::list_requests))
        .route("/requests/{id}/", get(history::get_request))
        .route("/stats/", get(history::usage_stats))
        .route("/config/", get(history::active_config))
        // 商品生成内容
        .route(
            "/products/{id}/generations/",
            get(generations::list_generations).post(generations::create_generation),
        )
        .route(
            "/generations/{id}/approve/",
            post(generations::approve_generation),
        )
        .route("/generations/{id}/use/", post(generations::use_generation))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ))
        .with_state(state)
}

/// 商品提示词路由
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/description/", post(product::generate_description))
        .route("/title/", post(product::generate_title))
        .route("/tags/", post(product::suggest_tags))
        .route("/analyze-image/", post(product::analyze_image))
}
