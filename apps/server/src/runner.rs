//! Scheduler loop.

use crate::cycle::{run_cycle, CycleOutcome};
use crate::schedule::Schedule;
use chrono::Utc;
use futures_util::FutureExt;
use pricebot_alerts::{BotState, Delivery, MessageSink, Notifier};
use pricebot_feeds::PriceFetcher;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, error, info};

/// Loop timing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSettings {
    pub schedule: Schedule,
    /// Extra pause after a failed cycle
    pub error_backoff: Duration,
}

/// Wait, run a cycle, repeat. Returns the final state once `shutdown` resolves.
///
/// Shutdown is only observed while waiting; a started cycle always completes
/// so a delivered message is never left unrecorded.
pub async fn run_bot<S, F>(
    fetcher: &PriceFetcher,
    notifier: &Notifier<S>,
    settings: RunSettings,
    shutdown: F,
) -> BotState
where
    S: MessageSink,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut state = BotState::new();
    let mut first_cycle = true;

    loop {
        let delay = settings.schedule.delay_before(Utc::now(), first_cycle);
        first_cycle = false;
        debug!(delay_ms = delay.as_millis() as u64, "Waiting for next cycle");

        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(delay) => {}
        }

        if !run_once(fetcher, notifier, &mut state).await && !settings.error_backoff.is_zero() {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(settings.error_backoff) => {}
            }
        }
    }

    info!("Price loop stopped");
    state
}

/// Run one cycle and log its outcome. Returns false when the cycle errored
/// or panicked; a panic never escapes into the loop.
pub async fn run_once<S: MessageSink>(
    fetcher: &PriceFetcher,
    notifier: &Notifier<S>,
    state: &mut BotState,
) -> bool {
    let cycle = AssertUnwindSafe(run_cycle(fetcher, notifier, state)).catch_unwind().await;
    match cycle {
        Ok(Ok(CycleOutcome::Delivered(Delivery::Sent { .. }))) => {
            debug!(price = ?state.last_sent_price, change = ?state.last_sent_change_percent, "Cycle complete");
            true
        }
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to send price update");
            false
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown".to_string());
            error!(reason = %reason, "Price cycle panicked");
            false
        }
    }
}
