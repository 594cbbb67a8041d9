use serde::{Deserialize, Serialize};
use std::fmt;

/// 被归入二级市场的交易所市场名称
pub const SECONDARY_MARKET_NAME: &str = "KOSDAQ";

/// 证券基础信息 (分类查询) 接口路径
pub const ISSUE_INFO_PATH: &str = "/svc/apis/sto/stk_isu_base_info";
/// 主板日成交接口路径
pub const PRIMARY_DAILY_TRADE_PATH: &str = "/svc/apis/sto/stk_bydd_trd";
/// 创业板日成交接口路径
pub const SECONDARY_DAILY_TRADE_PATH: &str = "/svc/apis/sto/ksq_bydd_trd";

/// # Summary
/// 证券所属市场分类。
///
/// # Invariants
/// - 两个取值互斥，单次请求内派生，不做缓存。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketClassification {
    // 主板 (KOSPI)
    PrimaryMarket,
    // 创业板 (KOSDAQ)
    SecondaryMarket,
}

impl MarketClassification {
    /// # Summary
    /// 由交易所返回的市场名称映射分类。
    ///
    /// # Logic
    /// 1. 名称等于 `KOSDAQ` 时归为 `SecondaryMarket`。
    /// 2. 其余名称一律归为 `PrimaryMarket`。
    pub fn from_market_name(name: &str) -> Self {
        if name == SECONDARY_MARKET_NAME {
            MarketClassification::SecondaryMarket
        } else {
            MarketClassification::PrimaryMarket
        }
    }

    /// 该市场对应的日成交行情接口路径
    pub fn daily_trade_path(&self) -> &'static str {
        match self {
            MarketClassification::PrimaryMarket => PRIMARY_DAILY_TRADE_PATH,
            MarketClassification::SecondaryMarket => SECONDARY_DAILY_TRADE_PATH,
        }
    }
}

impl fmt::Display for MarketClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketClassification::PrimaryMarket => write!(f, "kospi"),
            MarketClassification::SecondaryMarket => write!(f, "kosdaq"),
        }
    }
}

/// # Summary
/// 市场分类失败时的兜底策略。
///
/// # Invariants
/// - `DefaultToPrimary` 会把上游故障掩盖为 `PrimaryMarket`，实际属于二级市场的证券
///   将被查询到错误的行情接口。该策略保持历史行为，并在日志中以 `warn` 级别记录每次兜底。
/// - `Strict` 将分类错误原样向调用方传播。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    #[default]
    DefaultToPrimary,
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_market_name() {
        assert_eq!(
            MarketClassification::from_market_name("KOSDAQ"),
            MarketClassification::SecondaryMarket
        );
        assert_eq!(
            MarketClassification::from_market_name("KOSPI"),
            MarketClassification::PrimaryMarket
        );
        // 大小写敏感，与交易所原始返回值保持一致
        assert_eq!(
            MarketClassification::from_market_name("kosdaq"),
            MarketClassification::PrimaryMarket
        );
    }

    #[test]
    fn test_daily_trade_path_by_market() {
        assert_eq!(
            MarketClassification::PrimaryMarket.daily_trade_path(),
            "/svc/apis/sto/stk_bydd_trd"
        );
        assert_eq!(
            MarketClassification::SecondaryMarket.daily_trade_path(),
            "/svc/apis/sto/ksq_bydd_trd"
        );
    }

    #[test]
    fn test_fallback_policy_serde_names() {
        let strict: FallbackPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(strict, FallbackPolicy::Strict);
        let lenient: FallbackPolicy = serde_json::from_str("\"default_to_primary\"").unwrap();
        assert_eq!(lenient, FallbackPolicy::DefaultToPrimary);
        assert!(serde_json::from_str::<FallbackPolicy>("\"primary\"").is_err());
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::DefaultToPrimary);
    }
}
