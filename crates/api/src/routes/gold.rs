use axum::Json;
use axum::extract::State;

use relay_core::gold::GoldQuote;

use crate::server::AppState;
use crate::types::GoldPriceResponse;

/// 查询金价
///
/// 按配置的每克价格计算每돈 (3.75g) 价格。数据为静态配置值，不是实时行情。
#[utoipa::path(
    get,
    path = "/gold_price",
    tag = "金价 (Gold)",
    responses(
        (status = 200, description = "金价", body = GoldPriceResponse)
    )
)]
pub async fn get_gold_price(State(state): State<AppState>) -> Json<GoldPriceResponse> {
    let quote = GoldQuote::from_gram_price(state.config.gold.gram_price);
    Json(GoldPriceResponse {
        gold_1g: quote.gram_label(),
        gold_1don: quote.don_label(),
    })
}
