//! # `relay-api` - HTTP API 网关
//!
//! 本 crate 是 Relay 网关的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收入站 HTTP 请求并在发起任何外部调用之前完成参数校验
//! - 按需调用 `MarketResolver`、提示词构建函数与 `UpstreamClient` / `CompletionProvider`
//! - 将外部服务的结果或错误映射为 HTTP 响应与状态码

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
