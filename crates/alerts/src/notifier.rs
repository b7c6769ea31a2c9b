//! Quote notification logic.

use crate::config::AlertConfig;
use crate::dedupe::{BotState, DedupeFilter, SuppressReason};
use crate::message::{compose_message, ArrowPolicy};
use async_trait::async_trait;
use pricebot_core::Quote;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] crate::telegram::TelegramError),
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Destination for rendered price messages.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), NotifierError>;
}

/// Result of processing one quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { text: String },
    Suppressed { text: String, reason: SuppressReason },
}

impl Delivery {
    pub fn text(&self) -> &str {
        match self {
            Delivery::Sent { text } | Delivery::Suppressed { text, .. } => text,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent { .. })
    }
}

/// Formats quotes, filters repeats and hands the rest to a sink.
pub struct Notifier<S> {
    sink: S,
    arrow_policy: ArrowPolicy,
    filter: DedupeFilter,
}

impl<S: MessageSink> Notifier<S> {
    pub fn new(sink: S, config: &AlertConfig) -> Self {
        Self {
            sink,
            arrow_policy: config.arrow_policy,
            filter: config.dedupe_filter(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render the message for a quote relative to what was last sent.
    pub fn compose(&self, state: &BotState, quote: &Quote) -> String {
        compose_message(quote, self.arrow_policy.direction(quote, state))
    }

    /// Compose, dedupe and deliver one quote.
    ///
    /// `state` is updated only after the sink accepts the message; a failed
    /// delivery returns the error and leaves it untouched.
    pub async fn process_quote(
        &self,
        state: &mut BotState,
        quote: &Quote,
    ) -> Result<Delivery, NotifierError> {
        let text = self.compose(state, quote);

        if let Some(reason) = self.filter.check(state, quote, &text) {
            info!(source = %quote.source, reason = %reason, message = %text, "Skipping duplicate update");
            return Ok(Delivery::Suppressed { text, reason });
        }

        self.sink.deliver(&text).await?;
        info!(source = %quote.source, message = %text, "Price update sent");

        state.record_sent(quote, text.clone());
        Ok(Delivery::Sent { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::DedupePolicy;
    use pretty_assertions::assert_eq;
    use pricebot_core::Exchange;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Sink that records every delivered text.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn deliver(&self, text: &str) -> Result<(), NotifierError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotifierError::Delivery("chat not found".to_string()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn quote(price: Decimal, change: Decimal) -> Quote {
        Quote::new(price, change, Exchange::KuCoin)
    }

    #[tokio::test]
    async fn test_send_suppress_send_sequence() {
        let notifier = Notifier::new(RecordingSink::default(), &AlertConfig::default());
        let mut state = BotState::new();

        let first = notifier
            .process_quote(&mut state, &quote(dec!(1.500), dec!(1.00)))
            .await
            .unwrap();
        let second = notifier
            .process_quote(&mut state, &quote(dec!(1.500), dec!(1.00)))
            .await
            .unwrap();
        let third = notifier
            .process_quote(&mut state, &quote(dec!(1.600), dec!(2.00)))
            .await
            .unwrap();

        assert!(first.is_sent());
        assert_eq!(
            second,
            Delivery::Suppressed {
                text: "$1.500 ▲ [+1.00%]".to_string(),
                reason: SuppressReason::SameMessage,
            }
        );
        assert!(third.is_sent());
        assert_eq!(
            notifier.sink().sent(),
            vec!["$1.500 ▲ [+1.00%]".to_string(), "$1.600 ▲ [+2.00%]".to_string()]
        );
        assert_eq!(state.last_sent_price, Some(dec!(1.600)));
    }

    #[tokio::test]
    async fn test_identical_pair_sent_once() {
        let notifier = Notifier::new(RecordingSink::default(), &AlertConfig::default());
        let mut state = BotState::new();

        for _ in 0..2 {
            notifier
                .process_quote(&mut state, &quote(dec!(2.345), dec!(-0.50)))
                .await
                .unwrap();
        }

        assert_eq!(notifier.sink().sent(), vec!["$2.345 ▼ [-0.50%]".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_state() {
        let sink = RecordingSink::default();
        sink.fail.store(true, Ordering::SeqCst);
        let notifier = Notifier::new(sink, &AlertConfig::default());
        let mut state = BotState::new();

        let result = notifier
            .process_quote(&mut state, &quote(dec!(1.5), dec!(1)))
            .await;
        assert!(matches!(result, Err(NotifierError::Delivery(_))));
        assert_eq!(state, BotState::new());

        // Next cycle retries the same message once delivery recovers
        notifier.sink().fail.store(false, Ordering::SeqCst);
        let delivery = notifier
            .process_quote(&mut state, &quote(dec!(1.5), dec!(1)))
            .await
            .unwrap();
        assert!(delivery.is_sent());
    }

    #[tokio::test]
    async fn test_suppressed_quote_does_not_move_state() {
        let config = AlertConfig {
            dedupe: DedupePolicy::default_tolerance(),
            ..AlertConfig::default()
        };
        let notifier = Notifier::new(RecordingSink::default(), &config);
        let mut state = BotState::new();

        notifier
            .process_quote(&mut state, &quote(dec!(2.0000), dec!(1.000)))
            .await
            .unwrap();
        let delivery = notifier
            .process_quote(&mut state, &quote(dec!(2.0004), dec!(1.004)))
            .await
            .unwrap();

        assert_eq!(delivery.text(), "$2.000 ▲ [+1.00%]");
        assert!(!delivery.is_sent());
        assert_eq!(state.last_sent_price, Some(dec!(2.0000)));
        assert_eq!(state.last_sent_change_percent, Some(dec!(1.000)));
    }

    #[tokio::test]
    async fn test_arrow_follows_last_sent_price() {
        let notifier = Notifier::new(RecordingSink::default(), &AlertConfig::default());
        let mut state = BotState::new();

        notifier
            .process_quote(&mut state, &quote(dec!(2.0), dec!(-1)))
            .await
            .unwrap();
        let delivery = notifier
            .process_quote(&mut state, &quote(dec!(2.1), dec!(-0.5)))
            .await
            .unwrap();

        assert_eq!(delivery.text(), "$2.100 ▲ [-0.50%]");
    }
}
