//! Ticker endpoint adapters.
//!
//! Each exchange exposes its 24h ticker in its own REST shape.
//! Adapters build the request URL for a market and normalize the
//! response body into a `TickerSnapshot`.

mod bitget;
mod coingecko;
mod gateio;
mod htx;
mod kucoin;
mod mexc;
mod okx;

pub use bitget::BitgetAdapter;
pub use coingecko::CoinGeckoAdapter;
pub use gateio::GateIOAdapter;
pub use htx::HtxAdapter;
pub use kucoin::KuCoinAdapter;
pub use mexc::MexcAdapter;
pub use okx::OkxAdapter;

use crate::FeedError;
use pricebot_core::{
    fraction_to_percent, parse_decimal, percent_change, Exchange, Market, TickerSnapshot,
};
use rust_decimal::Decimal;

/// Trait for exchange-specific REST ticker adapters.
///
/// Parsing is defensive: a missing key, a non-decimal value or an
/// exchange-level error code is a `FeedError`, which the fetcher
/// treats as a failed endpoint.
pub trait TickerAdapter: Send + Sync {
    /// Get the exchange identifier
    fn exchange(&self) -> Exchange;

    /// Ticker URL for the given market
    fn url(&self, market: &Market) -> String;

    /// Parse a raw response body into price and change percent.
    fn parse_ticker(&self, market: &Market, body: &str) -> Result<TickerSnapshot, FeedError>;
}

/// Get the adapter for an exchange.
pub fn adapter_for(exchange: Exchange) -> Box<dyn TickerAdapter> {
    match exchange {
        Exchange::KuCoin => Box::new(KuCoinAdapter),
        Exchange::Okx => Box::new(OkxAdapter),
        Exchange::GateIO => Box::new(GateIOAdapter),
        Exchange::Mexc => Box::new(MexcAdapter),
        Exchange::Htx => Box::new(HtxAdapter),
        Exchange::Bitget => Box::new(BitgetAdapter),
        Exchange::CoinGecko => Box::new(CoinGeckoAdapter),
    }
}

/// Parse a decimal string field, naming the field on failure.
pub(crate) fn decimal_field(field: &str, text: &str) -> Result<Decimal, FeedError> {
    parse_decimal(text).map_err(|e| FeedError::invalid_decimal(field, e))
}

/// Parse a JSON number field through its textual form (no f64 round trip).
pub(crate) fn number_field(field: &str, number: &serde_json::Number) -> Result<Decimal, FeedError> {
    decimal_field(field, &number.to_string())
}

/// Parse a fractional change field (0.0123) as a percentage (1.23).
pub(crate) fn fraction_field(field: &str, text: &str) -> Result<Decimal, FeedError> {
    fraction_to_percent(decimal_field(field, text)?)
        .ok_or_else(|| FeedError::Overflow(field.to_string()))
}

/// Change percent derived from a reference price (24h open).
pub(crate) fn derived_change(
    field: &str,
    price: Decimal,
    reference: Decimal,
) -> Result<Decimal, FeedError> {
    if reference.is_zero() {
        return Err(FeedError::ZeroReference(field.to_string()));
    }
    percent_change(price, reference).ok_or_else(|| FeedError::Overflow(field.to_string()))
}
