use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{decimal_field, fraction_field, TickerAdapter};
use crate::FeedError;

pub struct BitgetAdapter;

/// Success code for Bitget REST responses.
const BITGET_OK: &str = "00000";

#[derive(Debug, Deserialize)]
struct BitgetTickersResponse {
    code: String,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Vec<BitgetTicker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BitgetTicker {
    last_pr: String,
    /// 24h change as a fraction (0.0123 = 1.23%)
    #[serde(rename = "change24h")]
    change_24h: String,
}

impl TickerAdapter for BitgetAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Bitget
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.bitget.com/api/v2/spot/market/tickers?symbol={}",
            market.concatenated()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let response: BitgetTickersResponse = serde_json::from_str(body)?;
        if response.code != BITGET_OK {
            return Err(FeedError::ParseError(format!(
                "Bitget error {}: {}",
                response.code,
                response.msg.unwrap_or_default()
            )));
        }

        let ticker = response
            .data
            .first()
            .ok_or_else(|| FeedError::MissingField("data[0]".to_string()))?;

        Ok(TickerSnapshot::new(
            decimal_field("data[0].lastPr", &ticker.last_pr)?,
            fraction_field("data[0].change24h", &ticker.change_24h)?,
        ))
    }
}
