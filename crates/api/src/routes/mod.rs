//! # 路由控制器
//!
//! 每个子模块对应一组能力，Handler 只负责校验、委派与响应格式化。

pub mod broker;
pub mod content;
pub mod gold;
pub mod health;
pub mod stock;

use axum::http::header;
use axum::response::{IntoResponse, Response};

/// 行情分析生成 token 上限
pub const STOCK_ANALYSIS_MAX_TOKENS: u32 = 500;
/// 博客生成 token 上限
pub const BLOG_POST_MAX_TOKENS: u32 = 1200;
/// SEO 评分生成 token 上限
pub const SEO_SCORE_MAX_TOKENS: u32 = 800;

/// # Summary
/// 将外部服务返回的 JSON 原样透传给调用方。
///
/// # Logic
/// 1. 校验响应体是合法 JSON (不重新序列化，保留字段顺序与格式)。
/// 2. 以 `application/json` 返回原始文本。
pub(crate) fn json_passthrough(body: String) -> Result<Response, serde_json::Error> {
    serde_json::from_str::<serde::de::IgnoredAny>(&body)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
