use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{decimal_field, fraction_field, TickerAdapter};
use crate::FeedError;

pub struct KuCoinAdapter;

/// Success code for KuCoin REST responses.
const KUCOIN_OK: &str = "200000";

#[derive(Debug, Deserialize)]
struct KuCoinStatsResponse {
    code: String,
    #[serde(default)]
    msg: Option<String>,
    data: Option<KuCoinStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KuCoinStats {
    last: Option<String>,
    /// 24h change as a fraction (0.0123 = 1.23%)
    change_rate: Option<String>,
}

impl TickerAdapter for KuCoinAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::KuCoin
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.kucoin.com/api/v1/market/stats?symbol={}",
            market.dashed()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let response: KuCoinStatsResponse = serde_json::from_str(body)?;
        if response.code != KUCOIN_OK {
            return Err(FeedError::ParseError(format!(
                "KuCoin error {}: {}",
                response.code,
                response.msg.unwrap_or_default()
            )));
        }

        // Unknown symbols come back as code 200000 with null fields
        let stats = response
            .data
            .ok_or_else(|| FeedError::MissingField("data".to_string()))?;
        let last = stats
            .last
            .ok_or_else(|| FeedError::MissingField("data.last".to_string()))?;
        let change_rate = stats
            .change_rate
            .ok_or_else(|| FeedError::MissingField("data.changeRate".to_string()))?;

        Ok(TickerSnapshot::new(
            decimal_field("data.last", &last)?,
            fraction_field("data.changeRate", &change_rate)?,
        ))
    }
}
