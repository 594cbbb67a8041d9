use crate::market::entity::{FallbackPolicy, MarketClassification};
use crate::market::error::ResolveError;
use async_trait::async_trait;

/// # Summary
/// 证券市场分类接口 (Port)。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`。
/// - `lookup` 每次最多发起一次外部调用，不做缓存。
#[async_trait]
pub trait MarketResolver: Send + Sync {
    /// # Summary
    /// 严格查询证券所属市场。
    ///
    /// # Logic
    /// 1. 调用分类查询接口。
    /// 2. 在返回列表中查找代码完全匹配的条目并映射市场名称。
    ///
    /// # Arguments
    /// * `symbol` - 证券代码。
    ///
    /// # Returns
    /// 成功返回分类；调用失败、响应无法解析或无匹配时返回 `ResolveError`。
    async fn lookup(&self, symbol: &str) -> Result<MarketClassification, ResolveError>;

    /// 分类失败时采用的兜底策略
    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::DefaultToPrimary
    }

    /// # Summary
    /// 按兜底策略查询证券所属市场。
    ///
    /// # Logic
    /// 1. 调用 `lookup`。
    /// 2. 失败时若策略为 `DefaultToPrimary`，记录 `warn` 日志并返回 `PrimaryMarket`。
    /// 3. 策略为 `Strict` 时原样返回错误。
    ///
    /// # Arguments
    /// * `symbol` - 证券代码。
    ///
    /// # Returns
    /// 分类结果；`DefaultToPrimary` 策略下恒为 `Ok`。
    async fn resolve(&self, symbol: &str) -> Result<MarketClassification, ResolveError> {
        match self.lookup(symbol).await {
            Ok(classification) => Ok(classification),
            Err(err) => match self.fallback_policy() {
                FallbackPolicy::DefaultToPrimary => {
                    tracing::warn!(
                        symbol,
                        error = %err,
                        "market classification failed, falling back to primary market"
                    );
                    Ok(MarketClassification::PrimaryMarket)
                }
                FallbackPolicy::Strict => Err(err),
            },
        }
    }
}
