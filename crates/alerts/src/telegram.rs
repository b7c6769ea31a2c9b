//! Telegram delivery.

use crate::notifier::{MessageSink, NotifierError};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};
use teloxide::utils::html;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
}

/// Telegram bot wrapper.
pub struct TelegramBot {
    bot: Bot,
}

impl TelegramBot {
    /// Create a new bot with the given token.
    pub fn new(token: &str) -> Self {
        let bot = Bot::new(token);
        Self { bot }
    }

    /// Get the underlying bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Check the token against the API. Returns the bot username.
    pub async fn verify(&self) -> Result<String, TelegramError> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }

    /// Send an HTML message to a destination.
    pub async fn send_alert(&self, destination: &Recipient, message: &str) -> Result<(), TelegramError> {
        self.bot
            .send_message(destination.clone(), message)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Numeric ids become chat ids, anything else a channel username.
pub fn parse_recipient(destination: &str) -> Recipient {
    let destination = destination.trim();
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if destination.starts_with('@') => Recipient::ChannelUsername(destination.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", destination)),
    }
}

/// Escape and wrap in a single bold tag.
pub fn bold_html(text: &str) -> String {
    html::bold(&html::escape(text))
}

/// Delivers messages, rendered bold, to one fixed Telegram destination.
pub struct TelegramSink {
    bot: Arc<TelegramBot>,
    destination: Recipient,
}

impl TelegramSink {
    pub fn new(bot: Arc<TelegramBot>, destination: &str) -> Self {
        Self {
            bot,
            destination: parse_recipient(destination),
        }
    }

    pub fn destination(&self) -> &Recipient {
        &self.destination
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn deliver(&self, text: &str) -> Result<(), NotifierError> {
        self.bot
            .send_alert(&self.destination, &bold_html(text))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_recipient_numeric() {
        assert_eq!(
            parse_recipient("-1001234567890"),
            Recipient::Id(ChatId(-1001234567890))
        );
    }

    #[test]
    fn test_parse_recipient_channel() {
        assert_eq!(
            parse_recipient("@TonPricx"),
            Recipient::ChannelUsername("@TonPricx".to_string())
        );
        assert_eq!(
            parse_recipient(" TonPricx "),
            Recipient::ChannelUsername("@TonPricx".to_string())
        );
    }

    #[test]
    fn test_bold_html() {
        assert_eq!(bold_html("$2.345 ▼ [-0.50%]"), "<b>$2.345 ▼ [-0.50%]</b>");
        assert_eq!(bold_html("a<b"), "<b>a&lt;b</b>");
    }

    #[test]
    fn test_sink_keeps_destination() {
        let bot = Arc::new(TelegramBot::new("123456:TEST"));
        let sink = TelegramSink::new(bot, "@TonPricx");
        assert_eq!(
            sink.destination(),
            &Recipient::ChannelUsername("@TonPricx".to_string())
        );
    }
}
