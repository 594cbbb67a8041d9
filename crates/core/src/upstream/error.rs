use std::fmt;
use thiserror::Error;

/// # Summary
/// 传输层失败的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// 超过单次调用超时
    Timeout,
    /// DNS 解析失败或连接被拒绝
    Connect,
    /// 请求构建或发送失败
    Request,
    /// 读取响应体失败
    Body,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Timeout => write!(f, "timeout"),
            TransportKind::Connect => write!(f, "connect"),
            TransportKind::Request => write!(f, "request"),
            TransportKind::Body => write!(f, "body"),
        }
    }
}

/// 非 2xx 响应体在错误中保留的最大字节数
pub const STATUS_BODY_PREVIEW_BYTES: usize = 512;

/// # Summary
/// 外部服务调用错误。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 非 2xx 响应一律以 `Status` 返回，不得静默视为成功。
/// - `Status.body` 只保留响应体开头至多 `STATUS_BODY_PREVIEW_BYTES` 字节。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// 网络层错误 (DNS、连接拒绝、超时等)
    #[error("{target} {kind} error: {detail}")]
    Transport {
        target: String,
        kind: TransportKind,
        detail: String,
    },
    /// 外部服务返回了非 2xx 状态码
    #[error("{target} returned HTTP {status}: {body}")]
    Status {
        target: String,
        status: u16,
        body: String,
    },
}
