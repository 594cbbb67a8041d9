//! # 金价换算
//!
//! 以固定的每克价格推算传统单位 "돈" (1 돈 = 3.75 g) 的价格。
//! 数据为静态配置值，不接入实时行情。

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 1 돈 对应的克数
pub const GRAMS_PER_DON: Decimal = dec!(3.75);

/// 默认每克金价 (원)
pub const DEFAULT_GRAM_PRICE: u64 = 87_500;

/// # Summary
/// 金价报价。
///
/// # Invariants
/// - `don_price == round_half_even(gram_price × 3.75)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldQuote {
    pub gram_price: Decimal,
    pub don_price: Decimal,
}

impl GoldQuote {
    /// # Summary
    /// 由每克价格计算报价。
    ///
    /// # Logic
    /// 1. 每克价格乘以 3.75。
    /// 2. 以银行家舍入 (四舍六入五成双) 取整。
    pub fn from_gram_price(gram_price: u64) -> Self {
        let gram_price = Decimal::from(gram_price);
        let don_price = (gram_price * GRAMS_PER_DON)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        Self {
            gram_price,
            don_price,
        }
    }

    /// 以 "원" 为单位格式化的每克价格
    pub fn gram_label(&self) -> String {
        format_won(self.gram_price)
    }

    /// 以 "원" 为单位格式化的每돈价格
    pub fn don_label(&self) -> String {
        format_won(self.don_price)
    }
}

fn format_won(amount: Decimal) -> String {
    format!("{}원", amount.normalize())
}
