//! # 测试替身
//!
//! 为各端口提供可预置结果、可记录调用的内存实现，仅在 `test-utils` feature 下编译。

use crate::completion::error::ModelError;
use crate::completion::port::CompletionProvider;
use crate::market::entity::{FallbackPolicy, MarketClassification};
use crate::market::error::ResolveError;
use crate::market::port::MarketResolver;
use crate::upstream::entity::{HttpMethod, RequestBody, UpstreamRequest, UpstreamResponse, UpstreamTarget};
use crate::upstream::error::UpstreamError;
use crate::upstream::port::{UpstreamClient, UpstreamResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// 一次被记录的出站调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub target: String,
    pub url: String,
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
    pub max_body_bytes: Option<usize>,
}

/// # Summary
/// 记录调用并按 `path` 返回预置结果的 `UpstreamClient`。
///
/// # Invariants
/// - 未预置的 `path` 返回 HTTP 404 的 `UpstreamError::Status`。
#[derive(Default)]
pub struct RecordingUpstreamClient {
    responses: Mutex<HashMap<String, UpstreamResult>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingUpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为指定路径预置 200 响应
    pub async fn respond_ok(&self, path: &str, body: impl Into<String>) {
        self.responses.lock().await.insert(
            path.to_string(),
            Ok(UpstreamResponse {
                status: 200,
                body: body.into(),
            }),
        );
    }

    /// 为指定路径预置错误
    pub async fn respond_err(&self, path: &str, err: UpstreamError) {
        self.responses.lock().await.insert(path.to_string(), Err(err));
    }

    /// 已记录的调用 (按发生顺序)
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl UpstreamClient for RecordingUpstreamClient {
    async fn call(&self, target: &UpstreamTarget, request: UpstreamRequest) -> UpstreamResult {
        self.calls.lock().await.push(RecordedCall {
            target: target.name.clone(),
            url: target.url_for(&request.path),
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            max_body_bytes: request.max_body_bytes,
        });

        match self.responses.lock().await.get(&request.path) {
            Some(result) => result.clone(),
            None => Err(UpstreamError::Status {
                target: target.name.clone(),
                status: 404,
                body: format!("no canned response for {}", request.path),
            }),
        }
    }
}

/// # Summary
/// 返回固定分类结果的 `MarketResolver`。
pub struct StubMarketResolver {
    result: Result<MarketClassification, ResolveError>,
    policy: FallbackPolicy,
}

impl StubMarketResolver {
    pub fn classified(classification: MarketClassification) -> Self {
        Self {
            result: Ok(classification),
            policy: FallbackPolicy::DefaultToPrimary,
        }
    }

    pub fn failing(err: ResolveError, policy: FallbackPolicy) -> Self {
        Self {
            result: Err(err),
            policy,
        }
    }
}

#[async_trait]
impl MarketResolver for StubMarketResolver {
    async fn lookup(&self, _symbol: &str) -> Result<MarketClassification, ResolveError> {
        self.result.clone()
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        self.policy
    }
}

/// # Summary
/// 返回固定文本并记录提示词的 `CompletionProvider`。
pub struct StubCompletion {
    reply: Result<String, ModelError>,
    prompts: Mutex<Vec<(String, u32)>>,
}

impl StubCompletion {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ModelError) -> Self {
        Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 已收到的 (提示词, token 上限)
    pub async fn prompts(&self) -> Vec<(String, u32)> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .await
            .push((prompt.to_string(), max_tokens));
        self.reply.clone().map(|text| text.trim().to_string())
    }
}
