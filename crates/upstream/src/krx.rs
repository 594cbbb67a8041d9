use async_trait::async_trait;
use relay_core::market::entity::{FallbackPolicy, ISSUE_INFO_PATH, MarketClassification};
use relay_core::market::error::ResolveError;
use relay_core::market::port::MarketResolver;
use relay_core::upstream::entity::{UpstreamRequest, UpstreamTarget};
use relay_core::upstream::port::UpstreamClient;
use serde::Deserialize;
use std::sync::Arc;

/// # Summary
/// 基于 KRX 证券基础信息接口的市场分类实现。
///
/// # Invariants
/// - 每次 `lookup` 只发起一次外部调用。
/// - 兜底策略在构建时确定，运行期不可修改。
pub struct KrxMarketResolver {
    client: Arc<dyn UpstreamClient>,
    target: UpstreamTarget,
    policy: FallbackPolicy,
}

impl KrxMarketResolver {
    pub fn new(client: Arc<dyn UpstreamClient>, target: UpstreamTarget, policy: FallbackPolicy) -> Self {
        Self {
            client,
            target,
            policy,
        }
    }
}

/// KRX 证券基础信息响应
#[derive(Deserialize, Debug)]
struct IssueInfoResponse {
    #[serde(rename = "OutBlock_1", default)]
    out_block: Vec<IssueInfo>,
}

#[derive(Deserialize, Debug)]
struct IssueInfo {
    #[serde(rename = "isuCd")]
    isu_cd: Option<String>,
    #[serde(rename = "mktNm")]
    mkt_nm: Option<String>,
}

#[async_trait]
impl MarketResolver for KrxMarketResolver {
    /// # Summary
    /// 查询证券所属市场。
    ///
    /// # Logic
    /// 1. 以 `{"mktsel": "ALL", "isuCd": symbol}` 调用基础信息接口。
    /// 2. 在 `OutBlock_1` 中查找 `isuCd` 与代码完全一致的条目。
    /// 3. 命中条目的 `mktNm` 为 `KOSDAQ` 时归为二级市场，否则归为主板。
    async fn lookup(&self, symbol: &str) -> Result<MarketClassification, ResolveError> {
        let request = UpstreamRequest::post_json(
            ISSUE_INFO_PATH,
            serde_json::json!({ "mktsel": "ALL", "isuCd": symbol }),
        );
        let response = self.client.call(&self.target, request).await?;

        let info: IssueInfoResponse = response
            .json()
            .map_err(|e| ResolveError::Malformed(e.to_string()))?;

        let entry = info
            .out_block
            .iter()
            .find(|item| item.isu_cd.as_deref() == Some(symbol))
            .ok_or_else(|| ResolveError::NotListed(symbol.to_string()))?;

        let market_name = entry
            .mkt_nm
            .as_deref()
            .ok_or_else(|| ResolveError::Malformed(format!("entry for {} has no mktNm", symbol)))?;

        let classification = MarketClassification::from_market_name(market_name);
        tracing::debug!(symbol, market = %classification, "market classified");
        Ok(classification)
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        self.policy
    }
}
