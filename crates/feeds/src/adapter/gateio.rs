use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{decimal_field, TickerAdapter};
use crate::FeedError;

pub struct GateIOAdapter;

#[derive(Debug, Deserialize)]
struct GateIOTicker {
    last: String,
    /// Already a percentage ("1.5" = 1.5%)
    change_percentage: String,
}

impl TickerAdapter for GateIOAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::GateIO
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.gateio.ws/api/v4/spot/tickers?currency_pair={}",
            market.underscored()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        // Response: [{"currency_pair":"TON_USDT","last":"5.43","change_percentage":"1.5",...}]
        let tickers: Vec<GateIOTicker> = serde_json::from_str(body)?;
        let ticker = tickers
            .first()
            .ok_or_else(|| FeedError::MissingField("[0]".to_string()))?;

        Ok(TickerSnapshot::new(
            decimal_field("[0].last", &ticker.last)?,
            decimal_field("[0].change_percentage", &ticker.change_percentage)?,
        ))
    }
}
