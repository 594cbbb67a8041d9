//! # `relay-core` - 网关领域核心
//!
//! 定义网关的领域实体、端口 (trait) 与错误类型，不包含任何网络 I/O。
//!
//! ## 模块划分
//! - `upstream`: 外部 HTTP 服务的目标描述、请求/响应模型与 `UpstreamClient` 端口
//! - `market`: 证券所属市场的分类与 `MarketResolver` 端口
//! - `completion`: 文本生成服务的 `CompletionProvider` 端口
//! - `common`: 入站请求实体及其校验
//! - `prompt`: 提示词构建纯函数
//! - `gold`: 金价换算纯函数
//! - `config`: 全局配置模型

pub mod common;
pub mod config;
pub mod gold;
pub mod prompt;

pub mod upstream {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod completion {
    pub mod error;
    pub mod port;
}

#[cfg(feature = "test-utils")]
pub mod test_utils;
