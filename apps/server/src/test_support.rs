//! Mock sources and sinks shared by the loop tests.

use async_trait::async_trait;
use pricebot_alerts::{MessageSink, NotifierError};
use pricebot_core::{Exchange, Quote};
use pricebot_feeds::{FeedError, PriceFetcher, QuoteProvider, RetryPolicy};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Answer {
    Quote(Decimal, Decimal),
    Timeout,
    Panic,
}

/// Provider that answers every call the same way.
pub struct FixedProvider {
    exchange: Exchange,
    answer: Answer,
    pub calls: Arc<AtomicUsize>,
}

impl FixedProvider {
    fn new(exchange: Exchange, answer: Answer) -> Self {
        Self {
            exchange,
            answer,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn quoting(exchange: Exchange, price: Decimal, change: Decimal) -> Self {
        Self::new(exchange, Answer::Quote(price, change))
    }

    /// Always times out.
    pub fn failing(exchange: Exchange) -> Self {
        Self::new(exchange, Answer::Timeout)
    }

    /// Panics mid-fetch.
    pub fn panicking(exchange: Exchange) -> Self {
        Self::new(exchange, Answer::Panic)
    }
}

#[async_trait]
impl QuoteProvider for FixedProvider {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn fetch(&self) -> Result<Quote, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Answer::Quote(price, change) => Ok(Quote::new(price, change, self.exchange)),
            Answer::Timeout => Err(FeedError::Timeout("request timed out".to_string())),
            Answer::Panic => panic!("malformed ticker arithmetic"),
        }
    }
}

/// Single-round fetcher over the given providers.
pub fn fetcher(providers: Vec<FixedProvider>) -> PriceFetcher {
    let providers = providers
        .into_iter()
        .map(|p| Box::new(p) as Box<dyn QuoteProvider>)
        .collect();
    PriceFetcher::new(
        providers,
        RetryPolicy {
            rounds: 1,
            delay: std::time::Duration::ZERO,
        },
    )
}

/// Sink that records delivered texts and can be told to fail.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn deliver(&self, text: &str) -> Result<(), NotifierError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifierError::Delivery("Bad Request: chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
