//! # 内容路由控制器
//!
//! 博客生成与网页 SEO 评分。

use axum::Json;
use axum::extract::State;

use relay_core::common::{BlogRequest, SeoRequest};
use relay_core::prompt::{SEO_PAGE_MAX_BYTES, build_blog_prompt, build_seo_prompt};
use relay_core::upstream::entity::{UpstreamRequest, UpstreamTarget};

use crate::error::ApiError;
use crate::routes::{BLOG_POST_MAX_TOKENS, SEO_SCORE_MAX_TOKENS};
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, ApiJson, BlogPostRequest, BlogPostResponse, SeoScoreRequest, SeoScoreResponse,
};

/// 生成博客文章
#[utoipa::path(
    post,
    path = "/generate_post",
    tag = "内容 (Content)",
    request_body = BlogPostRequest,
    responses(
        (status = 200, description = "生成的文章", body = BlogPostResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 500, description = "模型调用失败", body = ApiErrorResponse)
    )
)]
pub async fn generate_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BlogPostRequest>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let blog = BlogRequest::try_from(req)?;
    let prompt = build_blog_prompt(&blog.topic);

    let blog_content = state
        .completion
        .complete(&prompt, BLOG_POST_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::Upstream(format!("Model error: {}", e)))?;

    Ok(Json(BlogPostResponse {
        topic: blog.topic,
        blog_content,
    }))
}

/// 网页 SEO 评分
///
/// 抓取调用方给出的网页，截取 HTML 前 3000 个字符交由文本生成服务评估。
/// 抓取失败归咎于调用方给出的地址 (400)，模型失败为 500。
#[utoipa::path(
    post,
    path = "/seo_score",
    tag = "内容 (Content)",
    request_body = SeoScoreRequest,
    responses(
        (status = 200, description = "SEO 评估结果", body = SeoScoreResponse),
        (status = 400, description = "URL 非法或无法抓取", body = ApiErrorResponse),
        (status = 500, description = "模型调用失败", body = ApiErrorResponse)
    )
)]
pub async fn seo_score(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SeoScoreRequest>,
) -> Result<Json<SeoScoreResponse>, ApiError> {
    // 1. 校验 URL，非法时不发起任何外部调用
    let seo = SeoRequest::try_from(req)?;

    // 2. 抓取网页，只读取提示词用得到的开头部分
    let page_target = UpstreamTarget::new("page", seo.url.as_str(), state.config.fetch_timeout());
    let page = state
        .upstream
        .call(&page_target, UpstreamRequest::get("").limit_body(SEO_PAGE_MAX_BYTES))
        .await
        .map_err(|e| ApiError::BadRequest(format!("URL request failed: {}", e)))?;

    // 3. 构建提示词并评估
    let prompt = build_seo_prompt(&page.body);
    let seo_analysis = state
        .completion
        .complete(&prompt, SEO_SCORE_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::Upstream(format!("Model analysis failed: {}", e)))?;

    Ok(Json(SeoScoreResponse { seo_analysis }))
}
