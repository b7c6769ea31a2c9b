//! REST ticker fetching over a shared HTTP session.

use crate::adapter::TickerAdapter;
use crate::error::FeedError;
use crate::fetcher::QuoteProvider;
use async_trait::async_trait;
use pricebot_core::{Exchange, Market, Quote};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::trace;

/// Reusable HTTP session.
///
/// The underlying client is built on first use and kept for the process
/// lifetime. Every request is bounded by the session timeout.
pub struct HttpSession {
    timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl Default for HttpSession {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl HttpSession {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the client has been created yet.
    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&reqwest::Client, FeedError> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| FeedError::ClientBuild(e.to_string()))
            })
            .await
    }

    /// GET a URL and return the body. Non-2xx responses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let response = self.client().await?.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// Quote provider backed by one exchange's REST ticker endpoint.
pub struct RestQuoteProvider {
    adapter: Box<dyn TickerAdapter>,
    market: Arc<Market>,
    session: Arc<HttpSession>,
}

impl RestQuoteProvider {
    pub fn new(adapter: Box<dyn TickerAdapter>, market: Arc<Market>, session: Arc<HttpSession>) -> Self {
        Self {
            adapter,
            market,
            session,
        }
    }

    /// URL this provider polls.
    pub fn url(&self) -> String {
        self.adapter.url(&self.market)
    }
}

#[async_trait]
impl QuoteProvider for RestQuoteProvider {
    fn exchange(&self) -> Exchange {
        self.adapter.exchange()
    }

    async fn fetch(&self) -> Result<Quote, FeedError> {
        let url = self.url();
        trace!(exchange = %self.exchange(), url = %url, "Requesting ticker");

        let body = self.session.get_text(&url).await?;
        let snapshot = self.adapter.parse_ticker(&self.market, &body)?;
        Ok(snapshot.from_source(self.exchange()))
    }
}
