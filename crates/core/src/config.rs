use crate::market::entity::FallbackPolicy;
use crate::upstream::entity::{AuthScheme, UpstreamTarget};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// # Summary
/// 配置错误枚举。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 必需的密钥缺失
    #[error("missing required secret: {0}")]
    MissingSecret(&'static str),
    /// 配置值非法
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// # Summary
/// 密钥字符串，`Debug` 输出时隐藏明文。
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(***)")
        }
    }
}

/// 全局应用配置
///
/// # Invariants
/// - 启动时构建一次，之后以 `Arc<AppConfig>` 只读共享。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub krx: KrxConfig,
    pub broker: BrokerConfig,
    pub completion: CompletionConfig,
    pub content: ContentConfig,
    pub gold: GoldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 韩国交易所 (KRX) 开放接口
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KrxConfig {
    pub base_url: String,
    /// 行情接口密钥
    pub api_key: Secret,
    /// 分类查询接口密钥，缺省时不带鉴权调用
    pub lookup_api_key: Option<Secret>,
    pub timeout_secs: u64,
    pub fallback: FallbackPolicy,
}

/// 券商 OAuth 接口
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub base_url: String,
    pub app_key: Secret,
    pub app_secret: Secret,
    pub timeout_secs: u64,
}

/// OpenAI 兼容的文本生成接口
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: Secret,
    pub model: String,
    pub timeout_secs: u64,
}

/// 抓取调用方网页
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldConfig {
    /// 每克金价 (원)
    pub gram_price: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for KrxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data-dbg.krx.co.kr".to_string(),
            api_key: Secret::default(),
            lookup_api_key: None,
            timeout_secs: 10,
            fallback: FallbackPolicy::DefaultToPrimary,
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openapi.koreainvestment.com:9443".to_string(),
            app_key: Secret::default(),
            app_secret: Secret::default(),
            timeout_secs: 10,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: Secret::default(),
            model: "gpt-4".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 5,
        }
    }
}

impl Default for GoldConfig {
    fn default() -> Self {
        Self {
            gram_price: crate::gold::DEFAULT_GRAM_PRICE,
        }
    }
}

impl AppConfig {
    /// # Summary
    /// 启动前校验配置。
    ///
    /// # Logic
    /// 1. 校验文本生成、KRX 行情、券商 appkey/appsecret 四个必需密钥非空。
    /// 2. 校验所有超时为正数。
    ///
    /// # Returns
    /// 任一项不满足即返回 `ConfigError`，调用方应终止启动。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("completion.api_key (OPENAI_API_KEY)", &self.completion.api_key),
            ("krx.api_key (KRX_API_KEY)", &self.krx.api_key),
            ("broker.app_key (KIWOOM_APPKEY)", &self.broker.app_key),
            ("broker.app_secret (KIWOOM_SECRETKEY)", &self.broker.app_secret),
        ];
        for (name, secret) in required {
            if secret.is_blank() {
                return Err(ConfigError::MissingSecret(name));
            }
        }

        let timeouts = [
            ("krx.timeout_secs", self.krx.timeout_secs),
            ("broker.timeout_secs", self.broker.timeout_secs),
            ("completion.timeout_secs", self.completion.timeout_secs),
            ("content.fetch_timeout_secs", self.content.fetch_timeout_secs),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }

        if self.completion.model.trim().is_empty() {
            return Err(ConfigError::Invalid("completion.model must not be empty".into()));
        }
        Ok(())
    }

    /// KRX 行情接口目标 (Bearer 鉴权)
    pub fn krx_target(&self) -> UpstreamTarget {
        UpstreamTarget::new(
            "krx",
            self.krx.base_url.clone(),
            Duration::from_secs(self.krx.timeout_secs),
        )
        .with_auth(AuthScheme::Bearer {
            token: self.krx.api_key.expose().to_string(),
        })
    }

    /// KRX 分类查询接口目标
    pub fn krx_lookup_target(&self) -> UpstreamTarget {
        let auth = match &self.krx.lookup_api_key {
            Some(key) if !key.is_blank() => AuthScheme::Bearer {
                token: key.expose().to_string(),
            },
            _ => AuthScheme::None,
        };
        UpstreamTarget::new(
            "krx-lookup",
            self.krx.base_url.clone(),
            Duration::from_secs(self.krx.timeout_secs),
        )
        .with_auth(auth)
    }

    /// 券商 OAuth 接口目标
    pub fn broker_target(&self) -> UpstreamTarget {
        UpstreamTarget::new(
            "broker",
            self.broker.base_url.clone(),
            Duration::from_secs(self.broker.timeout_secs),
        )
        .with_auth(AuthScheme::ClientCredentials {
            app_key: self.broker.app_key.expose().to_string(),
            app_secret: self.broker.app_secret.expose().to_string(),
        })
    }

    /// 文本生成接口目标
    pub fn completion_target(&self) -> UpstreamTarget {
        UpstreamTarget::new(
            "openai",
            self.completion.base_url.clone(),
            Duration::from_secs(self.completion.timeout_secs),
        )
        .with_auth(AuthScheme::Bearer {
            token: self.completion.api_key.expose().to_string(),
        })
    }

    /// 抓取网页超时
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.content.fetch_timeout_secs)
    }
}
