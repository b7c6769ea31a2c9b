//! Application configuration.

use crate::schedule::Schedule;
use clap::{Parser, ValueEnum};
use pricebot_alerts::{AlertConfig, ArrowPolicy, DedupePolicy};
use pricebot_core::{Exchange, Market};
use pricebot_feeds::RetryPolicy;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

/// Used when BOT_TOKEN is not set; Telegram rejects it at startup.
pub const DEFAULT_BOT_TOKEN: &str = "0000000000:UNSET_BOT_TOKEN";
pub const DEFAULT_CHANNEL: &str = "@TonPricx";

/// Price ticker bot CLI
#[derive(Parser, Debug)]
#[command(name = "price-bot")]
#[command(about = "Posts a token's spot price to a Telegram channel every minute", long_about = None)]
pub struct Args {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", default_value = DEFAULT_BOT_TOKEN, hide_env_values = true, hide_default_value = true)]
    pub bot_token: String,

    /// Destination chat id or @channel
    #[arg(long, env = "CHANNEL_ID", default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Base asset
    #[arg(long, env = "PRICE_BASE", default_value = "TON")]
    pub base: String,

    /// Quote asset
    #[arg(long, env = "PRICE_QUOTE", default_value = "USDT")]
    pub quote: String,

    /// CoinGecko coin id for the base asset
    #[arg(long, env = "COINGECKO_ID", default_value = "the-open-network")]
    pub coingecko_id: String,

    /// CoinGecko vs-currency
    #[arg(long, env = "COINGECKO_VS", default_value = "usd")]
    pub coingecko_vs: String,

    /// Price sources in priority order
    #[arg(
        long,
        env = "PRICE_SOURCES",
        value_delimiter = ',',
        default_value = "kucoin,okx,gateio,mexc,htx,bitget,coingecko"
    )]
    pub sources: Vec<Exchange>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Rounds over all sources before a cycle gives up
    #[arg(long, default_value_t = 1)]
    pub retry_rounds: u32,

    /// Pause between retry rounds in seconds
    #[arg(long, default_value_t = 2)]
    pub retry_delay_secs: u64,

    /// Cycle timing
    #[arg(long, value_enum, env = "PRICE_SCHEDULE", default_value_t = ScheduleKind::Aligned)]
    pub schedule: ScheduleKind,

    /// Seconds between cycles for the interval schedule
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Run the first interval cycle right away
    #[arg(long, default_value_t = false)]
    pub fire_immediately: bool,

    /// Repeat detection
    #[arg(long, value_enum, env = "PRICE_DEDUPE", default_value_t = DedupeKind::Exact)]
    pub dedupe: DedupeKind,

    /// Price tolerance for the tolerance dedupe policy
    #[arg(long, default_value = "0.001")]
    pub price_tolerance: Decimal,

    /// Change tolerance (percentage points) for the tolerance dedupe policy
    #[arg(long, default_value = "0.01")]
    pub change_tolerance: Decimal,

    /// Never post quotes with exactly zero change
    #[arg(long, default_value_t = false)]
    pub suppress_zero_change: bool,

    /// Arrow policy: price-then-change, price-then-up, change-sign
    #[arg(long, default_value = "price-then-change")]
    pub arrow: ArrowPolicy,

    /// Extra pause after a failed cycle, in seconds
    #[arg(long, default_value_t = 0)]
    pub error_backoff_secs: u64,

    /// Run a single cycle and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScheduleKind {
    /// Top of every UTC minute
    Aligned,
    /// Fixed sleep between cycles
    Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupeKind {
    /// Identical message text
    Exact,
    /// Price and change within tolerances
    Tolerance,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("bot token is empty")]
    EmptyBotToken,
    #[error("destination channel is empty")]
    EmptyChannel,
    #[error("at least one price source is required")]
    NoSources,
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("{0} tolerance must not be negative")]
    NegativeTolerance(&'static str),
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub market: Market,
    /// Sources in priority order, without duplicates
    pub sources: Vec<Exchange>,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub schedule: Schedule,
    pub alert: AlertConfig,
    pub error_backoff: Duration,
    pub once: bool,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("market", &self.market)
            .field("sources", &self.sources)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .field("schedule", &self.schedule)
            .field("alert", &self.alert)
            .field("error_backoff", &self.error_backoff)
            .field("once", &self.once)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl AppConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let bot_token = args.bot_token.trim().to_string();
        if bot_token.is_empty() {
            return Err(ConfigError::EmptyBotToken);
        }
        if args.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }

        let mut sources: Vec<Exchange> = Vec::with_capacity(args.sources.len());
        for exchange in args.sources {
            if !sources.contains(&exchange) {
                sources.push(exchange);
            }
        }
        if sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }

        let schedule = match args.schedule {
            ScheduleKind::Aligned => Schedule::AlignedMinute,
            ScheduleKind::Interval => {
                if args.interval_secs == 0 {
                    return Err(ConfigError::ZeroDuration("interval"));
                }
                Schedule::FixedInterval {
                    period: Duration::from_secs(args.interval_secs),
                    fire_immediately: args.fire_immediately,
                }
            }
        };

        let dedupe = match args.dedupe {
            DedupeKind::Exact => DedupePolicy::ExactMessage,
            DedupeKind::Tolerance => {
                if args.price_tolerance.is_sign_negative() && !args.price_tolerance.is_zero() {
                    return Err(ConfigError::NegativeTolerance("price"));
                }
                if args.change_tolerance.is_sign_negative() && !args.change_tolerance.is_zero() {
                    return Err(ConfigError::NegativeTolerance("change"));
                }
                DedupePolicy::Tolerance {
                    price: args.price_tolerance,
                    change: args.change_tolerance,
                }
            }
        };

        Ok(Self {
            bot_token,
            market: Market::new(&args.base, &args.quote, &args.coingecko_id, &args.coingecko_vs),
            sources,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            retry: RetryPolicy {
                rounds: args.retry_rounds.max(1),
                delay: Duration::from_secs(args.retry_delay_secs),
            },
            schedule,
            alert: AlertConfig {
                destination: args.channel.trim().to_string(),
                arrow_policy: args.arrow,
                dedupe,
                suppress_zero_change: args.suppress_zero_change,
            },
            error_backoff: Duration::from_secs(args.error_backoff_secs),
            once: args.once,
            log_level: args.log_level,
        })
    }
}
