//! # API 服务器
//!
//! Axum HTTP服务器，挂载 `/api/ai` 接口以及 `/ping`

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use reqwest::Client;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::{optional_auth, request_timeout};
use crate::ai::{
    GemmaService, GenerationStore, ProductAiService, RequestHistory, UsageRecorder,
    build_http_client,
};
use crate::auth::JwtManager;
use crate::config::{AppConfig, ServerConfig};
use crate::error::{AppError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 推理服务的连接超时
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// API 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    db: Arc<DatabaseConnection>,
    http_client: Client,
    config: Arc<AppConfig>,
    jwt: JwtManager,
}

impl AppState {
    /// 创建应用状态，构建共享的 HTTP 客户端和 JWT 管理器
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Result<Self> {
        let http_client = build_http_client(CONNECT_TIMEOUT)?;
        let jwt = JwtManager::new(&config.auth);
        Ok(Self {
            db,
            http_client,
            config,
            jwt,
        })
    }

    #[must_use]
    pub const fn db(&self) -> &Arc<DatabaseConnection> {
        &self.db
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// 每次调用读取当前启用的 AI 配置
    pub async fn gemma(&self) -> Result<GemmaService> {
        GemmaService::new(self.db.clone(), self.http_client.clone(), &self.config.ai).await
    }

    pub async fn product_ai(&self) -> Result<ProductAiService> {
        Ok(ProductAiService::new(self.gemma().await?))
    }

    #[must_use]
    pub fn history(&self) -> RequestHistory {
        RequestHistory::new(self.db.clone())
    }

    #[must_use]
    pub fn usage(&self) -> UsageRecorder {
        UsageRecorder::new(self.db.clone())
    }

    #[must_use]
    pub fn generations(&self) -> GenerationStore {
        GenerationStore::new(self.db.clone())
    }
}

/// 构建完整的路由器（含中间件）
pub fn build_router(state: AppState) -> Router {
    let server_config = state.config().server.clone();

    let mut app = Router::new()
        .nest("/api/ai", super::routes::create_routes(state.clone()))
        .route("/ping", get(super::handlers::ping_handler));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(server_config.max_request_size));

    if server_config.enable_cors {
        app = app.layer(service_builder.layer(cors_layer(&server_config)));
    } else {
        app = app.layer(service_builder);
    }

    app.layer(axum::middleware::from_fn_with_state(
        state,
        request_timeout,
    ))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ]);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return cors_layer.allow_origin(Any);
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match origins {
        Ok(origins) => cors_layer.allow_origin(origins),
        Err(e) => {
            lwarn!(
                "system",
                LogStage::Startup,
                LogComponent::ServerSetup,
                "cors_config_fail",
                "Invalid CORS origin configuration, falling back to allow any",
                error = %e
            );
            cors_layer.allow_origin(Any)
        }
    }
}

/// API 服务器
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    /// 创建服务器
    #[must_use]
    pub fn new(state: AppState) -> Self {
        let config = state.config().server.clone();
        Self {
            config,
            router: build_router(state),
        }
    }

    /// 监听地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.config.socket_addr()
    }

    /// 启动服务器，收到 Ctrl+C 后优雅退出
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            "Starting API server",
            addr = %addr
        );

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::server_start_with_source(format!("无法绑定 {addr}"), e))?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::server_start_with_source("API server error", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "API server stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "signal_listen_failed",
            "无法监听 Ctrl+C 信号",
            error = %e
        );
        std::future::pending::<()>().await;
    }
}
