//! Price source identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Price source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Exchange {
    // CEX (100-199)
    KuCoin = 100,
    Okx = 101,
    GateIO = 102,
    Mexc = 103,
    Htx = 104,
    Bitget = 105,

    // Aggregators (200-299)
    CoinGecko = 200,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown exchange: {0}")]
pub struct UnknownExchange(pub String);

impl Exchange {
    /// Default fallback order: first success wins.
    pub const DEFAULT_PRIORITY: [Exchange; 7] = [
        Exchange::KuCoin,
        Exchange::Okx,
        Exchange::GateIO,
        Exchange::Mexc,
        Exchange::Htx,
        Exchange::Bitget,
        Exchange::CoinGecko,
    ];

    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            100 => Some(Exchange::KuCoin),
            101 => Some(Exchange::Okx),
            102 => Some(Exchange::GateIO),
            103 => Some(Exchange::Mexc),
            104 => Some(Exchange::Htx),
            105 => Some(Exchange::Bitget),
            200 => Some(Exchange::CoinGecko),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Whether this source quotes its own order book rather than aggregating others.
    #[inline]
    pub fn is_cex(self) -> bool {
        self.id() < 200
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Exchange::KuCoin => "KuCoin",
            Exchange::Okx => "OKX",
            Exchange::GateIO => "Gate.io",
            Exchange::Mexc => "MEXC",
            Exchange::Htx => "HTX",
            Exchange::Bitget => "Bitget",
            Exchange::CoinGecko => "CoinGecko",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = UnknownExchange;

    /// Accepts display names and common aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kucoin" => Ok(Exchange::KuCoin),
            "okx" | "okex" => Ok(Exchange::Okx),
            "gate.io" | "gateio" | "gate" => Ok(Exchange::GateIO),
            "mexc" => Ok(Exchange::Mexc),
            "htx" | "huobi" => Ok(Exchange::Htx),
            "bitget" => Ok(Exchange::Bitget),
            "coingecko" => Ok(Exchange::CoinGecko),
            _ => Err(UnknownExchange(s.to_string())),
        }
    }
}
