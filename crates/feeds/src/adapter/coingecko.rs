use pricebot_core::{Exchange, Market, TickerSnapshot};
use std::collections::HashMap;

use super::{number_field, TickerAdapter};
use crate::FeedError;

pub struct CoinGeckoAdapter;

/// Response: {"the-open-network":{"usd":5.43,"usd_24h_change":1.23}}
type SimplePriceResponse = HashMap<String, HashMap<String, Option<serde_json::Number>>>;

impl TickerAdapter for CoinGeckoAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::CoinGecko
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.coingecko.com/api/v3/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            market.coingecko_id, market.coingecko_vs
        )
    }

    fn parse_ticker(&self, market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let response: SimplePriceResponse = serde_json::from_str(body)?;
        let coin = response
            .get(&market.coingecko_id)
            .ok_or_else(|| FeedError::MissingField(market.coingecko_id.clone()))?;

        let price_key = market.coingecko_vs.as_str();
        let change_key = format!("{}_24h_change", market.coingecko_vs);
        let lookup = |key: &str| {
            coin.get(key)
                .and_then(Option::as_ref)
                .ok_or_else(|| FeedError::MissingField(format!("{}.{}", market.coingecko_id, key)))
        };

        Ok(TickerSnapshot::new(
            number_field(price_key, lookup(price_key)?)?,
            number_field(&change_key, lookup(change_key.as_str())?)?,
        ))
    }
}
