use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use relay_api::routes::broker::TOKEN_PATH;
use relay_api::server::{AppState, build_router};
use relay_core::config::{AppConfig, Secret};
use relay_core::market::entity::{ISSUE_INFO_PATH, PRIMARY_DAILY_TRADE_PATH, SECONDARY_DAILY_TRADE_PATH};
use relay_core::upstream::port::UpstreamClient;
use relay_upstream::http::{HttpUpstreamClient, install_crypto_provider};
use relay_upstream::krx::KrxMarketResolver;
use relay_upstream::openai::{CHAT_COMPLETIONS_PATH, OpenAiCompletion};
use serde_json::{Value, json};
use tokio::net::TcpListener;

// 帮助函数：在随机端口启动外部服务桩 (KRX / OpenAI / 券商 / 网页 共用一个端口)
async fn spawn_stub_upstream() -> String {
    async fn issue_info() -> Json<Value> {
        Json(json!({
            "OutBlock_1": [
                {"isuCd": "005930", "mktNm": "KOSPI"},
                {"isuCd": "091990", "mktNm": "KOSDAQ"},
            ]
        }))
    }

    async fn primary_trade(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "market": "kospi",
            "authorization": headers.get("authorization").and_then(|v| v.to_str().ok()),
            "request": body,
        }))
    }

    async fn secondary_trade(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "market": "kosdaq", "request": body }))
    }

    async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
        }
        let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
        let reply = if prompt.contains("'coffee'") {
            "X".to_string()
        } else {
            format!("max_tokens={}", body["max_tokens"])
        };
        (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": reply}}]})),
        )
    }

    async fn token(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "access_token": "broker-token",
            "appkey_header": headers.get("appkey").and_then(|v| v.to_str().ok()),
            "grant_type": body["grant_type"],
            "appkey": body["appkey"],
        }))
    }

    async fn page() -> &'static str {
        "<html><head><title>landing</title></head><body>hello</body></html>"
    }

    async fn huge_missing() -> (StatusCode, String) {
        (StatusCode::NOT_FOUND, "<p>gone</p>".repeat(200_000))
    }

    let app = Router::new()
        .route(ISSUE_INFO_PATH, post(issue_info))
        .route(PRIMARY_DAILY_TRADE_PATH, post(primary_trade))
        .route(SECONDARY_DAILY_TRADE_PATH, post(secondary_trade))
        .route(CHAT_COMPLETIONS_PATH, post(chat))
        .route(TOKEN_PATH, post(token))
        .route("/page", get(page))
        .route("/huge_missing", get(huge_missing));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// 帮助函数：以真实适配器组装网关并在随机端口启动
async fn spawn_gateway(upstream_base: &str) -> String {
    let mut config = AppConfig::default();
    config.krx.base_url = upstream_base.to_string();
    config.krx.api_key = Secret::new("krx-test");
    config.broker.base_url = upstream_base.to_string();
    config.broker.app_key = Secret::new("app-key");
    config.broker.app_secret = Secret::new("app-secret");
    config.completion.base_url = upstream_base.to_string();
    config.completion.api_key = Secret::new("sk-test");
    config.validate().unwrap();

    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstreamClient::new().unwrap());
    let resolver = Arc::new(KrxMarketResolver::new(
        upstream.clone(),
        config.krx_lookup_target(),
        config.krx.fallback,
    ));
    let completion = Arc::new(OpenAiCompletion::new(
        upstream.clone(),
        config.completion_target(),
        config.completion.model.clone(),
    ));
    let state = AppState::new(Arc::new(config), upstream, resolver, completion);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn http_client() -> reqwest::Client {
    install_crypto_provider();
    reqwest::Client::builder().build().unwrap()
}

#[tokio::test]
async fn test_full_gateway_workflow() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let upstream = spawn_stub_upstream().await;
    let gateway = spawn_gateway(&upstream).await;
    let client = http_client();

    // 1. 二级市场证券走二级市场行情接口
    let res = client
        .post(format!("{}/stock_info", gateway))
        .json(&json!({"symbol": "091990", "date": "20240102"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["market"], "kosdaq");
    assert_eq!(body["request"], json!({"basDd": "20240102", "isuCd": "091990"}));

    // 2. 主板证券走主板接口，且携带 KRX 密钥
    let body: Value = client
        .post(format!("{}/stock_info", gateway))
        .json(&json!({"symbol": "005930", "date": "2024-01-02"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["market"], "kospi");
    assert_eq!(body["authorization"], "Bearer krx-test");

    // 3. 未上市代码在默认兜底策略下按主板处理
    let body: Value = client
        .post(format!("{}/stock_info", gateway))
        .json(&json!({"symbol": "123456", "date": "20240102"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["market"], "kospi");

    // 4. 博客生成
    let body: Value = client
        .post(format!("{}/generate_post", gateway))
        .json(&json!({"topic": "coffee"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body, json!({"topic": "coffee", "blog_content": "X"}));

    // 5. 行情分析使用 500 token 上限
    let body: Value = client
        .post(format!("{}/stock_analysis", gateway))
        .json(&json!({"symbol": "005930", "date": "20240102"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["analysis"], "max_tokens=500");

    // 6. SEO 评分抓取网页后交由模型评估
    let body: Value = client
        .post(format!("{}/seo_score", gateway))
        .json(&json!({"url": format!("{}/page", upstream)}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["seo_analysis"], "max_tokens=800");

    // 7. 券商 Token
    let body: Value = client
        .get(format!("{}/kiwoom_token", gateway))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["access_token"], "broker-token");
    assert_eq!(body["appkey"], "app-key");
    assert_eq!(body["appkey_header"], Value::Null);
    assert_eq!(body["grant_type"], "client_credentials");

    // 8. 金价
    let body: Value = client
        .get(format!("{}/gold_price", gateway))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["gold_1don"], "328125원");

    Ok(())
}

#[tokio::test]
async fn test_gateway_error_paths() -> anyhow::Result<()> {
    let upstream = spawn_stub_upstream().await;
    let gateway = spawn_gateway(&upstream).await;
    let client = http_client();

    // 非法 URL
    let res = client
        .post(format!("{}/seo_score", gateway))
        .json(&json!({"url": "not-a-url"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);

    // 网页返回 404 归为调用方错误
    let res = client
        .post(format!("{}/seo_score", gateway))
        .json(&json!({"url": format!("{}/missing", upstream)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["detail"].as_str().unwrap().starts_with("URL request failed:"));

    // 超大的错误页只以预览形式出现在错误信息中
    let res = client
        .post(format!("{}/seo_score", gateway))
        .json(&json!({"url": format!("{}/huge_missing", upstream)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("URL request failed: page returned HTTP 404: <p>gone</p>"));
    assert!(detail.len() < 1024, "detail too long: {} bytes", detail.len());

    // 请求体不是 JSON
    let res = client
        .post(format!("{}/generate_post", gateway))
        .header("content-type", "application/json")
        .body("{topic")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
