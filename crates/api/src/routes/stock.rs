//! # 行情路由控制器
//!
//! 提供 KRX 日成交数据透传与基于文本生成服务的行情分析。

use axum::Json;
use axum::extract::State;
use axum::response::Response;

use relay_core::common::StockQuery;
use relay_core::prompt::build_stock_analysis_prompt;
use relay_core::upstream::entity::UpstreamRequest;

use crate::error::ApiError;
use crate::routes::{STOCK_ANALYSIS_MAX_TOKENS, json_passthrough};
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiJson, StockAnalysisResponse, StockQueryRequest};

fn krx_error(detail: impl std::fmt::Display) -> ApiError {
    ApiError::Upstream(format!("KRX API error: {}", detail))
}

/// 查询证券日成交数据
///
/// 先查询证券所属市场，再调用对应市场的日成交接口，响应体原样返回。
#[utoipa::path(
    post,
    path = "/stock_info",
    tag = "行情 (Stock)",
    request_body = StockQueryRequest,
    responses(
        (status = 200, description = "KRX 日成交数据 (原样透传)", body = serde_json::Value),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 500, description = "KRX 接口错误", body = ApiErrorResponse)
    )
)]
pub async fn get_stock_info(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StockQueryRequest>,
) -> Result<Response, ApiError> {
    // 1. 校验
    let query = StockQuery::try_from(req)?;

    // 2. 市场分类 (兜底策略由 resolver 决定)
    let market = state
        .market_resolver
        .resolve(&query.symbol)
        .await
        .map_err(krx_error)?;
    tracing::info!(symbol = %query.symbol, market = %market, "fetching daily trade data");

    // 3. 按市场选择行情接口
    let request = UpstreamRequest::post_json(
        market.daily_trade_path(),
        serde_json::json!({ "basDd": query.bas_dd(), "isuCd": query.symbol }),
    );
    let response = state
        .upstream
        .call(&state.targets.krx, request)
        .await
        .map_err(krx_error)?;

    json_passthrough(response.body).map_err(krx_error)
}

/// 行情分析
///
/// 以证券代码与日期构建提示词，交由文本生成服务分析。
#[utoipa::path(
    post,
    path = "/stock_analysis",
    tag = "行情 (Stock)",
    request_body = StockQueryRequest,
    responses(
        (status = 200, description = "分析结果", body = StockAnalysisResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 500, description = "模型调用失败", body = ApiErrorResponse)
    )
)]
pub async fn analyze_stock(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StockQueryRequest>,
) -> Result<Json<StockAnalysisResponse>, ApiError> {
    let query = StockQuery::try_from(req)?;
    let prompt = build_stock_analysis_prompt(&query.date, &query.symbol);

    let analysis = state
        .completion
        .complete(&prompt, STOCK_ANALYSIS_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::Upstream(format!("Model error: {}", e)))?;

    Ok(Json(StockAnalysisResponse { analysis }))
}
