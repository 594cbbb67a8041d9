use async_trait::async_trait;
use relay_core::upstream::entity::{HttpMethod, RequestBody, UpstreamRequest, UpstreamResponse, UpstreamTarget};
use relay_core::upstream::error::{STATUS_BODY_PREVIEW_BYTES, TransportKind, UpstreamError};
use relay_core::upstream::port::{UpstreamClient, UpstreamResult};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("relay-gateway/", env!("CARGO_PKG_VERSION"));

/// 建立 TCP/TLS 连接的超时，整体超时由每次调用单独指定
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Logic
/// 1. 尝试注册 ring 为默认 `CryptoProvider`。
/// 2. 已被注册过时忽略。
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// # Summary
/// 基于 `reqwest` 的 `UpstreamClient` 实现。
///
/// # Invariants
/// - 所有目标共享同一个连接池。
/// - 每次调用都显式设置超时。
#[derive(Clone)]
pub struct HttpUpstreamClient {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl HttpUpstreamClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Logic
    /// 1. 确保 rustls 加密后端已安装。
    /// 2. 配置连接超时与 User-Agent。
    ///
    /// # Returns
    /// 底层客户端构建失败时返回 `reqwest::Error`。
    pub fn new() -> Result<Self, reqwest::Error> {
        install_crypto_provider();
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

/// 将 `reqwest` 错误归类为传输层错误
fn transport_error(target: &UpstreamTarget, err: reqwest::Error) -> UpstreamError {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportKind::Body
    } else {
        TransportKind::Request
    };
    UpstreamError::Transport {
        target: target.name.clone(),
        kind,
        detail: err.to_string(),
    }
}

/// # Summary
/// 分块读取响应体，读满 `cap` 字节即停止。
///
/// # Logic
/// 1. 逐块追加，超出上限的部分截掉并丢弃剩余数据。
/// 2. 按 UTF-8 解码，非法字节 (含被截断的尾部字符) 替换为 U+FFFD。
async fn read_body(
    target: &UpstreamTarget,
    mut response: reqwest::Response,
    cap: Option<usize>,
) -> Result<String, UpstreamError> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| transport_error(target, e))?
    {
        match cap {
            Some(cap) if buf.len() + chunk.len() >= cap => {
                let remaining = cap.saturating_sub(buf.len());
                buf.extend_from_slice(chunk.get(..remaining).unwrap_or(&chunk[..]));
                break;
            }
            _ => buf.extend_from_slice(&chunk),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    /// # Summary
    /// 发起一次出站调用。
    ///
    /// # Logic
    /// 1. 拼接地址，选择方法并设置目标超时。
    /// 2. 附加目标鉴权 Header 与 JSON 请求体。
    /// 3. 2xx 按请求的 `max_body_bytes` 读取响应体。
    /// 4. 非 2xx 只读取响应体开头作为预览，返回 `UpstreamError::Status`。
    async fn call(&self, target: &UpstreamTarget, request: UpstreamRequest) -> UpstreamResult {
        let url = target.url_for(&request.path);
        let timeout = target.timeout;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        tracing::debug!(
            upstream = %target.name,
            method = %request.method,
            url = %url,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "calling upstream"
        );

        let mut builder = self.client.request(method, &url).timeout(timeout);
        for (name, value) in target.auth.headers() {
            builder = builder.header(name, value);
        }
        if let RequestBody::Json(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = transport_error(target, e);
            tracing::warn!(upstream = %target.name, url = %url, error = %err, "upstream call failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            // 预览读取失败不影响状态码的上报
            let body = read_body(target, response, Some(STATUS_BODY_PREVIEW_BYTES))
                .await
                .unwrap_or_default();
            tracing::warn!(
                upstream = %target.name,
                url = %url,
                status = status.as_u16(),
                "upstream returned non-success status"
            );
            return Err(UpstreamError::Status {
                target: target.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body = read_body(target, response, request.max_body_bytes).await?;
        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}
