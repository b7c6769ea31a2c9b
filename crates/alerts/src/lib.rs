//! Price message alerts.
//!
//! This crate provides:
//! - Message formatting (truncated price, signed change, direction arrow)
//! - Duplicate suppression against the last sent quote
//! - Telegram bot integration for delivery

pub mod config;
pub mod dedupe;
pub mod message;
pub mod notifier;
pub mod telegram;

pub use config::AlertConfig;
pub use dedupe::{BotState, DedupeFilter, DedupePolicy, SuppressReason};
pub use message::{compose_message, format_change, format_price, ArrowPolicy, Direction};
pub use notifier::{Delivery, MessageSink, Notifier, NotifierError};
pub use telegram::{TelegramBot, TelegramError, TelegramSink};
