use crate::upstream::entity::{UpstreamRequest, UpstreamResponse, UpstreamTarget};
use crate::upstream::error::UpstreamError;
use async_trait::async_trait;

/// 单次外部调用的结果
pub type UpstreamResult = Result<UpstreamResponse, UpstreamError>;

/// # Summary
/// 外部 HTTP 服务调用接口 (Port)。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`，由所有请求并发共享。
/// - 不做重试、不做缓存，每次调用相互独立。
/// - 传输失败以 `UpstreamError::Transport` 返回，不得 panic。
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// # Summary
    /// 向指定目标发起一次调用。
    ///
    /// # Logic
    /// 1. 根据目标的 `base_url` 与请求 `path` 拼接地址。
    /// 2. 附加目标鉴权 Header 与请求自带 Header。
    /// 3. 以请求覆盖值或目标默认值作为超时发送请求。
    /// 4. 2xx 返回响应体，其余状态码返回 `UpstreamError::Status`。
    ///
    /// # Arguments
    /// * `target` - 目标服务描述。
    /// * `request` - 请求描述。
    ///
    /// # Returns
    /// 成功返回 `UpstreamResponse`，失败返回分类后的 `UpstreamError`。
    async fn call(&self, target: &UpstreamTarget, request: UpstreamRequest) -> UpstreamResult;
}
