mod settings;

use std::sync::Arc;

use relay_api::server::{AppState, start_server};
use relay_core::upstream::port::UpstreamClient;
use relay_upstream::http::HttpUpstreamClient;
use relay_upstream::krx::KrxMarketResolver;
use relay_upstream::openai::OpenAiCompletion;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置并实例化全部外部适配器，通过 `Arc<dyn Trait>` 注入到 API 层。
///
/// # Logic
/// 1. 读取 `.env` 并初始化全局日志。
/// 2. 加载并校验配置，密钥缺失时终止启动。
/// 3. 实例化基础设施层（共享 HTTP 客户端）。
/// 4. 实例化领域适配器（市场分类、文本生成）。
/// 5. 启动 HTTP 服务直到收到 Ctrl-C。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与日志
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();
    info!("Relay Gateway starting...");
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    // 2. 配置
    let config = settings::load()?;
    config.validate()?;
    let config = Arc::new(config);
    info!(
        krx = %config.krx.base_url,
        broker = %config.broker.base_url,
        completion = %config.completion.base_url,
        model = %config.completion.model,
        fallback = ?config.krx.fallback,
        "Configuration loaded"
    );

    // 3. 基础设施层
    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstreamClient::new()?);

    // 4. 领域适配器
    let market_resolver = Arc::new(KrxMarketResolver::new(
        upstream.clone(),
        config.krx_lookup_target(),
        config.krx.fallback,
    ));
    let completion = Arc::new(OpenAiCompletion::new(
        upstream.clone(),
        config.completion_target(),
        config.completion.model.clone(),
    ));

    // 5. 启动服务
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, upstream, market_resolver, completion);
    start_server(state, &bind_addr).await?;

    info!("Shutdown complete. Exiting...");
    Ok(())
}
