use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// # Summary
/// 出站请求的鉴权方式。
///
/// # Invariants
/// - `Debug` 输出中不得包含任何凭证明文。
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthScheme {
    /// 无鉴权
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer { token: String },
    /// 券商 OAuth client-credentials 授权 (appkey / appsecret)
    ClientCredentials { app_key: String, app_secret: String },
}

impl AuthScheme {
    /// # Summary
    /// 生成需要附加到出站请求上的鉴权 Header。
    ///
    /// # Logic
    /// 1. `None` 不附加任何 Header。
    /// 2. `Bearer` 附加 `authorization`。
    /// 3. `ClientCredentials` 的凭证只出现在授权请求体中，不附加 Header。
    ///
    /// # Returns
    /// Header 名称与值的列表。
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            AuthScheme::None | AuthScheme::ClientCredentials { .. } => Vec::new(),
            AuthScheme::Bearer { token } => {
                vec![("authorization".to_string(), format!("Bearer {}", token))]
            }
        }
    }

    /// # Summary
    /// 构建 OAuth client-credentials 授权请求体。
    ///
    /// # Returns
    /// 仅 `ClientCredentials` 返回 `Some`，其余鉴权方式没有授权请求体。
    pub fn grant_body(&self) -> Option<Value> {
        match self {
            AuthScheme::ClientCredentials {
                app_key,
                app_secret,
            } => Some(serde_json::json!({
                "grant_type": "client_credentials",
                "appkey": app_key,
                "appsecret": app_secret,
            })),
            _ => None,
        }
    }
}

impl fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::None => write!(f, "None"),
            AuthScheme::Bearer { .. } => write!(f, "Bearer(***)"),
            AuthScheme::ClientCredentials { .. } => write!(f, "ClientCredentials(***)"),
        }
    }
}

/// # Summary
/// 外部服务目标描述。
///
/// # Invariants
/// - 启动时由配置构建，之后只读共享，任何请求都不得修改。
/// - `timeout` 必须显式给出，不依赖 HTTP 库的隐式默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// 服务名称，用于日志与错误信息
    pub name: String,
    /// 基础地址，如 `https://data-dbg.krx.co.kr`
    pub base_url: String,
    /// 鉴权方式
    pub auth: AuthScheme,
    /// 单次调用超时
    pub timeout: Duration,
}

impl UpstreamTarget {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            auth: AuthScheme::None,
            timeout,
        }
    }

    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// # Summary
    /// 拼接完整请求地址。
    ///
    /// # Logic
    /// 1. `path` 为空时直接使用 `base_url` (用于抓取调用方给出的网页)。
    /// 2. 否则去掉 `base_url` 尾部的 `/` 后与 `path` 拼接，`path` 缺少前导 `/` 时补上。
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// # Summary
/// 网关用到的 HTTP 方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// # Summary
/// 出站请求体。
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
}

/// # Summary
/// 一次出站调用的描述。
///
/// # Invariants
/// - `max_body_bytes` 为 `Some` 时，响应体读满该字节数即停止读取，其余部分丢弃。
/// - 超时始终取目标的 `timeout`。
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
    pub max_body_bytes: Option<usize>,
}

impl UpstreamRequest {
    /// 构建不带请求体的 GET 请求
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: RequestBody::Empty,
            max_body_bytes: None,
        }
    }

    /// 构建 JSON 请求体的 POST 请求
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: RequestBody::Json(body),
            max_body_bytes: None,
        }
    }

    /// 限制读取的响应体字节数 (抓取调用方给出的网页时使用)
    pub fn limit_body(mut self, max_bytes: usize) -> Self {
        self.max_body_bytes = Some(max_bytes);
        self
    }
}

/// # Summary
/// 外部服务的成功 (2xx) 响应。
///
/// # Invariants
/// - 仅存在于单次请求/响应周期内，不做任何持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    /// 将响应体解析为指定类型
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
