use crate::upstream::error::UpstreamError;
use thiserror::Error;

/// # Summary
/// 文本生成服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// 生成接口调用失败 (网络或非 2xx)
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// 响应结构不符合预期
    #[error("malformed completion response: {0}")]
    Malformed(String),

    /// 响应中没有可用的生成文本
    #[error("completion returned no content")]
    EmptyCompletion,
}
