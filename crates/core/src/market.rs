//! Tracked market definition and per-exchange symbol renderings.

use serde::{Deserialize, Serialize};

/// The token pair whose price is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Base asset (e.g., "TON")
    pub base: String,
    /// Quote asset (e.g., "USDT")
    pub quote: String,
    /// CoinGecko coin id (e.g., "the-open-network")
    pub coingecko_id: String,
    /// CoinGecko vs-currency (e.g., "usd")
    pub coingecko_vs: String,
}

impl Default for Market {
    fn default() -> Self {
        Self::new("TON", "USDT", "the-open-network", "usd")
    }
}

impl Market {
    /// Create a market. Symbols are normalized to uppercase, CoinGecko ids to lowercase.
    pub fn new(base: &str, quote: &str, coingecko_id: &str, coingecko_vs: &str) -> Self {
        Self {
            base: base.trim().to_uppercase(),
            quote: quote.trim().to_uppercase(),
            coingecko_id: coingecko_id.trim().to_lowercase(),
            coingecko_vs: coingecko_vs.trim().to_lowercase(),
        }
    }

    /// "TON-USDT" (KuCoin, OKX)
    pub fn dashed(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }

    /// "TON_USDT" (Gate.io)
    pub fn underscored(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }

    /// "TONUSDT" (MEXC, Bitget)
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// "tonusdt" (HTX)
    pub fn lower_concatenated(&self) -> String {
        self.concatenated().to_lowercase()
    }
}
