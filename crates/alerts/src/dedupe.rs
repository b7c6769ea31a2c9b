//! Duplicate suppression against the last sent quote.

use pricebot_core::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What was last delivered. Reset on restart; only updated after a successful send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotState {
    pub last_sent_price: Option<Decimal>,
    pub last_sent_change_percent: Option<Decimal>,
    pub last_sent_message: Option<String>,
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been delivered yet.
    pub fn has_sent(&self) -> bool {
        self.last_sent_message.is_some()
    }

    /// Record a delivered quote and its rendered text.
    pub fn record_sent(&mut self, quote: &Quote, message: String) {
        self.last_sent_price = Some(quote.price);
        self.last_sent_change_percent = Some(quote.change_percent);
        self.last_sent_message = Some(message);
    }
}

/// When a fresh quote counts as a repeat of the last sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupePolicy {
    /// Rendered text equals the last sent text.
    #[default]
    ExactMessage,
    /// Price and change both moved less than the given amounts
    /// (or the rendered text is identical).
    Tolerance { price: Decimal, change: Decimal },
}

impl DedupePolicy {
    /// Price within 0.001 and change within 0.01 percentage points.
    pub fn default_tolerance() -> Self {
        DedupePolicy::Tolerance {
            price: Decimal::new(1, 3),
            change: Decimal::new(1, 2),
        }
    }
}

/// Why a quote was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Change is exactly zero and zero-change suppression is on
    ZeroChange,
    /// Identical to the last sent message
    SameMessage,
    /// Within tolerance of the last sent quote
    WithinTolerance,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SuppressReason::ZeroChange => "zero change",
            SuppressReason::SameMessage => "same message",
            SuppressReason::WithinTolerance => "within tolerance",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupeFilter {
    pub policy: DedupePolicy,
    pub suppress_zero_change: bool,
}

impl DedupeFilter {
    pub fn new(policy: DedupePolicy, suppress_zero_change: bool) -> Self {
        Self {
            policy,
            suppress_zero_change,
        }
    }

    /// Returns the reason to suppress, or None if the message should go out.
    pub fn check(&self, state: &BotState, quote: &Quote, message: &str) -> Option<SuppressReason> {
        if self.suppress_zero_change && quote.change_percent.is_zero() {
            return Some(SuppressReason::ZeroChange);
        }

        if state.last_sent_message.as_deref() == Some(message) {
            return Some(SuppressReason::SameMessage);
        }

        if let DedupePolicy::Tolerance { price, change } = self.policy {
            if let (Some(last_price), Some(last_change)) =
                (state.last_sent_price, state.last_sent_change_percent)
            {
                if within(quote.price, last_price, price)
                    && within(quote.change_percent, last_change, change)
                {
                    return Some(SuppressReason::WithinTolerance);
                }
            }
        }

        None
    }
}

/// Distance strictly below the tolerance. An overflowing distance is never within.
fn within(current: Decimal, last: Decimal, tolerance: Decimal) -> bool {
    current
        .checked_sub(last)
        .is_some_and(|diff| diff.abs() < tolerance)
}
