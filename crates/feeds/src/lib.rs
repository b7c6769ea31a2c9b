//! Price fetching from exchange REST APIs.
//!
//! ## Architecture
//!
//! - `adapter/` - Exchange-specific ticker URLs and response parsing
//! - `rest` - Shared HTTP session and the REST-backed `QuoteProvider`
//! - `fetcher` - `PriceFetcher`, the ordered fallback chain with retry rounds

pub mod adapter;
pub mod error;
pub mod fetcher;
pub mod rest;

pub use adapter::{
    adapter_for, BitgetAdapter, CoinGeckoAdapter, GateIOAdapter, HtxAdapter, KuCoinAdapter,
    MexcAdapter, OkxAdapter, TickerAdapter,
};
pub use error::*;
pub use fetcher::*;
pub use rest::*;
