//! # `relay-upstream` - 出站适配器
//!
//! 以 `reqwest` 实现 `relay-core` 中定义的各个端口。
//!
//! - `http`: 通用 `UpstreamClient` 实现
//! - `krx`: 基于 KRX 证券基础信息接口的 `MarketResolver`
//! - `openai`: 基于 OpenAI 兼容接口的 `CompletionProvider`

pub mod http;
pub mod krx;
pub mod openai;
