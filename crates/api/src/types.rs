//! # DTO (Data Transfer Object) 层
//!
//! 入站请求体与出站响应体的 JSON 结构。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use relay_core::common::{BlogRequest, SeoRequest, StockQuery, ValidationError};

use crate::error::ApiError;

/// # Summary
/// JSON 请求体提取器，解析失败时返回统一的 400 错误体。
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// ============================================================
//  请求 DTO
// ============================================================

/// 证券查询请求体 (行情查询与行情分析共用)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockQueryRequest {
    /// 证券代码
    #[schema(example = "005930")]
    pub symbol: String,
    /// 交易日期 (YYYYMMDD 或 YYYY-MM-DD)
    #[schema(example = "20240102")]
    pub date: String,
}

/// 博客生成请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPostRequest {
    /// 文章主题
    #[schema(example = "coffee")]
    pub topic: String,
}

/// SEO 评分请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeoScoreRequest {
    /// 待评估网页的 http/https 绝对地址
    #[schema(example = "https://example.com")]
    pub url: String,
}

// ============================================================
//  响应 DTO
// ============================================================

/// 金价响应 (静态数据，非实时行情)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoldPriceResponse {
    /// 每克金价
    #[schema(example = "87500원")]
    pub gold_1g: String,
    /// 每돈 (3.75g) 金价
    #[schema(example = "328125원")]
    pub gold_1don: String,
}

/// 行情分析响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockAnalysisResponse {
    pub analysis: String,
}

/// 博客生成响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPostResponse {
    /// 原样回显请求主题
    #[schema(example = "coffee")]
    pub topic: String,
    pub blog_content: String,
}

/// SEO 评分响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeoScoreResponse {
    pub seo_analysis: String,
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// 统一失败响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    #[schema(example = "KRX API error: krx returned HTTP 401: unauthorized")]
    pub detail: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: msg.into(),
        }
    }
}

// ============================================================
//  DTO → 领域实体 (校验)
// ============================================================

impl TryFrom<StockQueryRequest> for StockQuery {
    type Error = ValidationError;

    fn try_from(req: StockQueryRequest) -> Result<Self, Self::Error> {
        StockQuery::new(&req.symbol, &req.date)
    }
}

impl TryFrom<BlogPostRequest> for BlogRequest {
    type Error = ValidationError;

    fn try_from(req: BlogPostRequest) -> Result<Self, Self::Error> {
        BlogRequest::new(&req.topic)
    }
}

impl TryFrom<SeoScoreRequest> for SeoRequest {
    type Error = ValidationError;

    fn try_from(req: SeoScoreRequest) -> Result<Self, Self::Error> {
        SeoRequest::new(&req.url)
    }
}
