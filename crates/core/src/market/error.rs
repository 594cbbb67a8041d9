use crate::upstream::error::UpstreamError;
use thiserror::Error;

/// # Summary
/// 市场分类错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    // 分类查询接口调用失败
    #[error("classification lookup failed: {0}")]
    Upstream(#[from] UpstreamError),
    // 响应无法解析
    #[error("malformed classification response: {0}")]
    Malformed(String),
    // 响应中没有与代码匹配的条目
    #[error("symbol {0} not listed")]
    NotListed(String),
}
