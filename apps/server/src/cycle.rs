//! One poll cycle: fetch, format, dedupe, send.

use pricebot_alerts::{BotState, Delivery, MessageSink, Notifier, NotifierError};
use pricebot_feeds::PriceFetcher;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Notification failed: {0}")]
    Notify(#[from] NotifierError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every source failed; nothing was sent.
    NoData,
    Delivered(Delivery),
}

pub async fn run_cycle<S: MessageSink>(
    fetcher: &PriceFetcher,
    notifier: &Notifier<S>,
    state: &mut BotState,
) -> Result<CycleOutcome, CycleError> {
    let Some(quote) = fetcher.fetch_quote().await else {
        error!(sources = ?fetcher.sources(), "Failed to fetch price from all sources");
        return Ok(CycleOutcome::NoData);
    };

    let delivery = notifier.process_quote(state, &quote).await?;
    Ok(CycleOutcome::Delivered(delivery))
}
