//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 与请求日志并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use relay_core::completion::port::CompletionProvider;
use relay_core::config::AppConfig;
use relay_core::market::port::MarketResolver;
use relay_core::upstream::entity::UpstreamTarget;
use relay_core::upstream::port::UpstreamClient;

use crate::routes::{broker, content, gold, health, stock};

// ============================================================
//  共享应用状态
// ============================================================

/// 启动时由配置构建的固定外部目标。
///
/// # Invariants
/// - 构建后只读，所有请求共享。
#[derive(Debug, Clone)]
pub struct GatewayTargets {
    /// KRX 行情接口
    pub krx: UpstreamTarget,
    /// 券商 OAuth 接口
    pub broker: UpstreamTarget,
}

impl GatewayTargets {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            krx: config.krx_target(),
            broker: config.broker_target(),
        }
    }
}

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有字段在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - 不存在跨请求的可变状态。
#[derive(Clone)]
pub struct AppState {
    /// 只读配置
    pub config: Arc<AppConfig>,
    /// 固定外部目标
    pub targets: Arc<GatewayTargets>,
    /// 外部 HTTP 调用端口
    pub upstream: Arc<dyn UpstreamClient>,
    /// 市场分类端口
    pub market_resolver: Arc<dyn MarketResolver>,
    /// 文本生成端口
    pub completion: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        upstream: Arc<dyn UpstreamClient>,
        market_resolver: Arc<dyn MarketResolver>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        let targets = Arc::new(GatewayTargets::from_config(&config));
        Self {
            config,
            targets,
            upstream,
            market_resolver,
            completion,
        }
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relay Gateway API",
        version = "0.1.0",
        description = "KRX 行情、券商 OAuth 与文本生成服务的聚合网关。",
        license(name = "MIT")
    ),
    tags(
        (name = "行情 (Stock)", description = "KRX 日成交数据与行情分析"),
        (name = "金价 (Gold)", description = "静态金价换算"),
        (name = "内容 (Content)", description = "博客生成与 SEO 评分"),
        (name = "券商 (Broker)", description = "券商 OAuth Token 获取"),
        (name = "系统 (System)", description = "健康检查")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册全部业务路由并收集 OpenAPI 文档。
/// 2. 挂载 Swagger UI。
/// 3. 应用 CORS 与请求日志中间件。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(stock::get_stock_info))
        .routes(routes!(stock::analyze_stock))
        .routes(routes!(gold::get_gold_price))
        .routes(routes!(content::generate_post))
        .routes(routes!(content::seo_score))
        .routes(routes!(broker::get_broker_token))
        .routes(routes!(health::health))
        .with_state(state)
        .split_for_parts();

    // 开发阶段允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// # Summary
/// 绑定端口并启动 HTTP 监听，收到 Ctrl-C 后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8000"`
///
/// # Returns
/// 绑定或服务过程中的 I/O 错误。
pub async fn start_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    tracing::info!("🚀 Relay Gateway listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relay Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听 Ctrl-C 信号: {}", e);
        // 无法监听时保持运行，由进程外部终止
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
