use pricebot_core::{Exchange, Market, TickerSnapshot};
use serde::Deserialize;

use super::{derived_change, number_field, TickerAdapter};
use crate::FeedError;

pub struct HtxAdapter;

#[derive(Debug, Deserialize)]
struct HtxMergedResponse {
    status: String,
    #[serde(rename = "err-msg", default)]
    err_msg: Option<String>,
    tick: Option<HtxTick>,
}

/// HTX reports prices as JSON numbers, not strings.
#[derive(Debug, Deserialize)]
struct HtxTick {
    close: serde_json::Number,
    open: serde_json::Number,
}

impl TickerAdapter for HtxAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Htx
    }

    fn url(&self, market: &Market) -> String {
        format!(
            "https://api.huobi.pro/market/detail/merged?symbol={}",
            market.lower_concatenated()
        )
    }

    fn parse_ticker(&self, _market: &Market, body: &str) -> Result<TickerSnapshot, FeedError> {
        let response: HtxMergedResponse = serde_json::from_str(body)?;
        if response.status != "ok" {
            return Err(FeedError::ParseError(format!(
                "HTX error: {}",
                response.err_msg.unwrap_or(response.status)
            )));
        }

        let tick = response
            .tick
            .ok_or_else(|| FeedError::MissingField("tick".to_string()))?;
        let close = number_field("tick.close", &tick.close)?;
        let open = number_field("tick.open", &tick.open)?;

        Ok(TickerSnapshot::new(
            close,
            derived_change("tick.open", close, open)?,
        ))
    }
}
