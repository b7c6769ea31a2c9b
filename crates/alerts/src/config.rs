//! Alert configuration types.

use crate::dedupe::{DedupeFilter, DedupePolicy};
use crate::message::ArrowPolicy;
use serde::{Deserialize, Serialize};

/// Delivery and formatting settings for the price channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Telegram destination: numeric chat id or "@channel"
    pub destination: String,
    /// Arrow selection rule
    pub arrow_policy: ArrowPolicy,
    /// Repeat detection rule
    pub dedupe: DedupePolicy,
    /// Skip quotes whose change is exactly zero
    pub suppress_zero_change: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            destination: "@TonPricx".to_string(),
            arrow_policy: ArrowPolicy::default(),
            dedupe: DedupePolicy::default(),
            suppress_zero_change: false,
        }
    }
}

impl AlertConfig {
    /// Create a config for a destination with default policies.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Default::default()
        }
    }

    pub fn dedupe_filter(&self) -> DedupeFilter {
        DedupeFilter::new(self.dedupe, self.suppress_zero_change)
    }
}
