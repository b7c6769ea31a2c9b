use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{decimal_field, TickerAdapter};
use crate::FeedError;

pub struct MexcAdapter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MexcTicker24h {
    last_price: String,
    price_change_percent: String,
}

impl TickerAdapter for MexcAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Mexc
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.mexc.com/api/v3/ticker/24hr?symbol={}",
            market.concatenated()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let ticker: MexcTicker24h = serde_json::from_str(body)?;
        Ok(TickerSnapshot::new(
            decimal_field("lastPrice", &ticker.last_price)?,
            decimal_field("priceChangePercent", &ticker.price_change_percent)?,
        ))
    }
}
