use chrono::NaiveDate;
use thiserror::Error;
use url::Url;

/// # Summary
/// 入站请求校验错误，映射为 4xx 响应。
///
/// # Invariants
/// - 必须在发起任何外部调用之前产生。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // 必填字段为空
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    // 日期格式无法识别
    #[error("invalid date `{0}`, expected YYYYMMDD or YYYY-MM-DD")]
    InvalidDate(String),
    // URL 不是合法的 http/https 绝对地址
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// # Summary
/// 证券查询实体 (行情查询与行情分析共用)。
///
/// # Invariants
/// - `symbol` 已去除首尾空白且非空。
/// - `date` 为合法的日历日期。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuery {
    // 证券代码 (例如: 005930)
    pub symbol: String,
    // 调用方提交的原始日期文本
    pub date: String,
    // 解析后的交易日期
    pub trade_date: NaiveDate,
}

impl StockQuery {
    /// # Summary
    /// 校验并构建证券查询。
    ///
    /// # Logic
    /// 1. 代码去除首尾空白后不得为空。
    /// 2. 日期接受 `YYYYMMDD` 与 `YYYY-MM-DD` 两种格式。
    ///
    /// # Returns
    /// 校验失败返回 `ValidationError`。
    pub fn new(symbol: &str, date: &str) -> Result<Self, ValidationError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationError::EmptyField("symbol"));
        }
        let date = date.trim();
        if date.is_empty() {
            return Err(ValidationError::EmptyField("date"));
        }
        let trade_date = parse_trade_date(date)?;

        Ok(Self {
            symbol: symbol.to_string(),
            date: date.to_string(),
            trade_date,
        })
    }

    /// 交易所接口使用的 `basDd` 格式 (YYYYMMDD)
    pub fn bas_dd(&self) -> String {
        self.trade_date.format("%Y%m%d").to_string()
    }
}

fn parse_trade_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    // 紧凑格式先补上分隔符，避免 `%Y` 贪婪匹配
    let normalized = if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8])
    } else {
        raw.to_string()
    };
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// # Summary
/// 博客生成请求实体。
///
/// # Invariants
/// - `topic` 去除空白后非空；保留原文用于响应回显。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRequest {
    pub topic: String,
}

impl BlogRequest {
    pub fn new(topic: &str) -> Result<Self, ValidationError> {
        if topic.trim().is_empty() {
            return Err(ValidationError::EmptyField("topic"));
        }
        Ok(Self {
            topic: topic.to_string(),
        })
    }
}

/// # Summary
/// SEO 评分请求实体。
///
/// # Invariants
/// - `url` 必须是带主机名的 http/https 绝对地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoRequest {
    pub url: Url,
}

impl SeoRequest {
    /// # Summary
    /// 校验并构建 SEO 评分请求。
    ///
    /// # Logic
    /// 1. 按绝对 URL 解析，相对地址直接拒绝。
    /// 2. 协议必须是 `http` 或 `https`。
    /// 3. 主机名不得为空。
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(raw.trim()).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(ValidationError::InvalidUrl("missing host".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_query_accepts_both_date_formats() {
        let compact = StockQuery::new(" 005930 ", "20240102").unwrap();
        assert_eq!(compact.symbol, "005930");
        assert_eq!(compact.bas_dd(), "20240102");

        let dashed = StockQuery::new("005930", "2024-01-02").unwrap();
        assert_eq!(dashed.bas_dd(), "20240102");
        assert_eq!(dashed.date, "2024-01-02");
    }

    #[test]
    fn test_stock_query_rejects_bad_input() {
        assert_eq!(
            StockQuery::new("  ", "20240102"),
            Err(ValidationError::EmptyField("symbol"))
        );
        assert_eq!(
            StockQuery::new("005930", ""),
            Err(ValidationError::EmptyField("date"))
        );
        assert!(matches!(
            StockQuery::new("005930", "20241301"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            StockQuery::new("005930", "yesterday"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_blog_request() {
        assert_eq!(BlogRequest::new("coffee").unwrap().topic, "coffee");
        assert_eq!(
            BlogRequest::new(" \t"),
            Err(ValidationError::EmptyField("topic"))
        );
    }

    #[test]
    fn test_seo_request_url_rules() {
        assert!(SeoRequest::new("https://example.com/page").is_ok());
        assert!(SeoRequest::new("http://localhost:8080").is_ok());

        assert!(matches!(
            SeoRequest::new("not-a-url"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            SeoRequest::new("ftp://example.com/file"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            SeoRequest::new("file:///etc/passwd"),
            Err(ValidationError::InvalidUrl(_))
        ));
    }
}
