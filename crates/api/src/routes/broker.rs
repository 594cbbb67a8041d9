use axum::extract::State;
use axum::response::Response;

use relay_core::upstream::entity::UpstreamRequest;

use crate::error::ApiError;
use crate::routes::json_passthrough;
use crate::server::AppState;
use crate::types::ApiErrorResponse;

/// 券商 OAuth Token 接口路径
pub const TOKEN_PATH: &str = "/oauth2/tokenP";

fn broker_error(detail: impl std::fmt::Display) -> ApiError {
    ApiError::Upstream(format!("Broker token request failed: {}", detail))
}

/// 获取券商访问 Token
///
/// 以配置的 appkey / appsecret 发起 client-credentials 授权，响应体原样返回。
#[utoipa::path(
    get,
    path = "/kiwoom_token",
    tag = "券商 (Broker)",
    responses(
        (status = 200, description = "券商 OAuth 响应 (原样透传)", body = serde_json::Value),
        (status = 500, description = "Token 获取失败", body = ApiErrorResponse)
    )
)]
pub async fn get_broker_token(State(state): State<AppState>) -> Result<Response, ApiError> {
    let target = &state.targets.broker;
    let grant = target
        .auth
        .grant_body()
        .ok_or_else(|| broker_error("client credentials are not configured"))?;

    let response = state
        .upstream
        .call(target, UpstreamRequest::post_json(TOKEN_PATH, grant))
        .await
        .map_err(broker_error)?;

    json_passthrough(response.body).map_err(broker_error)
}
