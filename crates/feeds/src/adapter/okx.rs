use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{decimal_field, derived_change, TickerAdapter};
use crate::FeedError;

pub struct OkxAdapter;

#[derive(Debug, Deserialize)]
struct OkxTickerResponse {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<OkxTicker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OkxTicker {
    last: String,
    /// Open price 24 hours ago
    #[serde(rename = "open24h")]
    open_24h: String,
}

impl TickerAdapter for OkxAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Okx
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://www.okx.com/api/v5/market/ticker?instId={}",
            market.dashed()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let response: OkxTickerResponse = serde_json::from_str(body)?;
        if response.code != "0" {
            return Err(FeedError::ParseError(format!(
                "OKX error {}: {}",
                response.code, response.msg
            )));
        }

        let ticker = response
            .data
            .first()
            .ok_or_else(|| FeedError::MissingField("data[0]".to_string()))?;
        let last = decimal_field("data[0].last", &ticker.last)?;
        let open = decimal_field("data[0].open24h", &ticker.open_24h)?;

        Ok(TickerSnapshot::new(
            last,
            derived_change("data[0].open24h", last, open)?,
        ))
    }
}
