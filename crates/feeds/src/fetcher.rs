//! Price fetcher: an ordered fallback chain over quote providers.

use crate::adapter::adapter_for;
use crate::error::FeedError;
use crate::rest::{HttpSession, RestQuoteProvider};
use async_trait::async_trait;
use pricebot_core::{Exchange, Market, Quote};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A single price source.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Source this provider reports as.
    fn exchange(&self) -> Exchange;

    /// Fetch one quote. Any error marks this source as failed for the round.
    async fn fetch(&self) -> Result<Quote, FeedError>;
}

/// How many times the whole chain is walked before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of rounds over all providers (at least 1)
    pub rounds: u32,
    /// Pause between rounds
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rounds: 1,
            delay: Duration::from_secs(2),
        }
    }
}

/// Tries providers in priority order and returns the first quote.
///
/// Providers are queried one at a time, never concurrently.
pub struct PriceFetcher {
    providers: Vec<Box<dyn QuoteProvider>>,
    retry: RetryPolicy,
}

impl PriceFetcher {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>, retry: RetryPolicy) -> Self {
        Self { providers, retry }
    }

    /// Build a REST chain for a market, in the given exchange order.
    pub fn for_market(
        market: Market,
        exchanges: &[Exchange],
        session: Arc<HttpSession>,
        retry: RetryPolicy,
    ) -> Self {
        let market = Arc::new(market);
        let providers = exchanges
            .iter()
            .map(|&exchange| {
                Box::new(RestQuoteProvider::new(
                    adapter_for(exchange),
                    Arc::clone(&market),
                    Arc::clone(&session),
                )) as Box<dyn QuoteProvider>
            })
            .collect();
        Self::new(providers, retry)
    }

    /// Sources in the order they are tried.
    pub fn sources(&self) -> Vec<Exchange> {
        self.providers.iter().map(|p| p.exchange()).collect()
    }

    /// One pass over the chain.
    pub async fn fetch_once(&self) -> Option<Quote> {
        for provider in &self.providers {
            match provider.fetch().await {
                Ok(quote) => return Some(quote),
                Err(e) => {
                    debug!(
                        exchange = %provider.exchange(),
                        error = %e,
                        transient = e.is_transient(),
                        "Price source failed, trying next"
                    );
                }
            }
        }
        None
    }

    /// Walk the chain up to `rounds` times. Returns None when every round fails.
    pub async fn fetch_quote(&self) -> Option<Quote> {
        let rounds = self.retry.rounds.max(1);

        for round in 1..=rounds {
            if let Some(quote) = self.fetch_once().await {
                if round > 1 {
                    debug!(round, source = %quote.source, "Price fetched after retry");
                }
                return Some(quote);
            }

            if round < rounds {
                warn!(
                    round,
                    rounds,
                    delay_ms = self.retry.delay.as_millis() as u64,
                    "All price sources failed, retrying"
                );
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider that replays scripted results; repeats the last one when exhausted.
    struct ScriptedProvider {
        exchange: Exchange,
        script: Mutex<VecDeque<Result<Quote, FeedError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn new(exchange: Exchange, script: Vec<Result<Quote, FeedError>>) -> Self {
            Self {
                exchange,
                script: Mutex::new(script.into()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(exchange: Exchange) -> Self {
            Self::new(exchange, vec![Err(FeedError::Timeout("timed out".into()))])
        }

        fn ok(exchange: Exchange, price: rust_decimal::Decimal, change: rust_decimal::Decimal) -> Self {
            Self::new(exchange, vec![Ok(Quote::new(price, change, exchange))])
        }
    }

    #[async_trait]
    impl QuoteProvider for ScriptedProvider {
        fn exchange(&self) -> Exchange {
            self.exchange
        }

        async fn fetch(&self) -> Result<Quote, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                None
            };
            match next {
                Some(result) => result,
                None => match script.front() {
                    Some(Ok(quote)) => Ok(*quote),
                    Some(Err(e)) => Err(FeedError::ConnectionFailed(e.to_string())),
                    None => Err(FeedError::ConnectionFailed("empty script".into())),
                },
            }
        }
    }

    fn no_delay(rounds: u32) -> RetryPolicy {
        RetryPolicy {
            rounds,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = ScriptedProvider::ok(Exchange::KuCoin, dec!(5.4321), dec!(1.23));
        let second = ScriptedProvider::ok(Exchange::Okx, dec!(9), dec!(9));
        let second_calls = Arc::clone(&second.calls);

        let fetcher = PriceFetcher::new(vec![Box::new(first), Box::new(second)], no_delay(1));
        let quote = fetcher.fetch_quote().await.unwrap();

        assert_eq!(quote, Quote::new(dec!(5.4321), dec!(1.23), Exchange::KuCoin));
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_falls_through_to_next_source() {
        let fetcher = PriceFetcher::new(
            vec![
                Box::new(ScriptedProvider::failing(Exchange::KuCoin)),
                Box::new(ScriptedProvider::ok(Exchange::Okx, dec!(2.345), dec!(-0.50))),
            ],
            no_delay(1),
        );

        let quote = fetcher.fetch_quote().await.unwrap();
        assert_eq!(quote.source, Exchange::Okx);
        assert_eq!(quote.price, dec!(2.345));
        assert_eq!(quote.change_percent, dec!(-0.50));
    }

    #[tokio::test]
    async fn test_all_sources_fail_returns_none() {
        let first = ScriptedProvider::failing(Exchange::KuCoin);
        let second = ScriptedProvider::new(
            Exchange::GateIO,
            vec![Err(FeedError::MissingField("[0]".into()))],
        );
        let (first_calls, second_calls) = (Arc::clone(&first.calls), Arc::clone(&second.calls));

        let fetcher = PriceFetcher::new(vec![Box::new(first), Box::new(second)], no_delay(1));
        assert_eq!(fetcher.fetch_quote().await, None);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_rounds_until_success() {
        let flaky = ScriptedProvider::new(
            Exchange::Mexc,
            vec![
                Err(FeedError::Status(502)),
                Err(FeedError::Status(502)),
                Ok(Quote::new(dec!(1.5), dec!(1), Exchange::Mexc)),
            ],
        );
        let calls = Arc::clone(&flaky.calls);

        let fetcher = PriceFetcher::new(vec![Box::new(flaky)], no_delay(3));
        let quote = fetcher.fetch_quote().await.unwrap();
        assert_eq!(quote.source, Exchange::Mexc);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_sleeps_between_rounds_only() {
        let provider = ScriptedProvider::failing(Exchange::Htx);
        let calls = Arc::clone(&provider.calls);
        let fetcher = PriceFetcher::new(
            vec![Box::new(provider)],
            RetryPolicy {
                rounds: 3,
                delay: Duration::from_secs(2),
            },
        );

        let start = tokio::time::Instant::now();
        assert_eq!(fetcher.fetch_quote().await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_zero_rounds_still_tries_once() {
        let provider = ScriptedProvider::failing(Exchange::Bitget);
        let calls = Arc::clone(&provider.calls);
        let fetcher = PriceFetcher::new(vec![Box::new(provider)], no_delay(0));
        assert_eq!(fetcher.fetch_quote().await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_has_no_data() {
        let fetcher = PriceFetcher::new(Vec::new(), no_delay(1));
        assert_eq!(fetcher.fetch_quote().await, None);
    }

    #[test]
    fn test_for_market_keeps_order() {
        let fetcher = PriceFetcher::for_market(
            Market::default(),
            &[Exchange::CoinGecko, Exchange::KuCoin],
            Arc::new(HttpSession::default()),
            RetryPolicy::default(),
        );
        assert_eq!(fetcher.sources(), vec![Exchange::CoinGecko, Exchange::KuCoin]);
    }
}
