//! Price Bot - Headless Server
//!
//! Polls exchange tickers and posts the token price to a Telegram channel
//! once a minute.

mod config;
mod cycle;
mod runner;
mod schedule;
#[cfg(test)]
mod test_support;

use clap::Parser;
use config::{AppConfig, Args};
use pricebot_alerts::{BotState, Notifier, TelegramBot, TelegramSink};
use pricebot_feeds::{HttpSession, PriceFetcher};
use runner::{run_bot, run_once, RunSettings};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // HTTP client internals stay quiet even at debug
    let filter = EnvFilter::new(format!("{},hyper=warn,hyper_util=warn,reqwest=warn", level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match AppConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting price bot");
    info!("  Market: {}", config.market.dashed());
    info!("  Sources: {:?}", config.sources);
    info!("  Destination: {}", config.alert.destination);
    info!("  Schedule: {:?}", config.schedule);

    let bot = Arc::new(TelegramBot::new(&config.bot_token));
    match bot.verify().await {
        Ok(username) => info!(bot = %username, "Connected to Telegram"),
        Err(e) => {
            error!(error = %e, "Failed to connect to Telegram");
            return ExitCode::FAILURE;
        }
    }

    let session = Arc::new(HttpSession::new(config.request_timeout));
    let fetcher = PriceFetcher::for_market(
        config.market.clone(),
        &config.sources,
        session,
        config.retry,
    );
    let sink = TelegramSink::new(Arc::clone(&bot), &config.alert.destination);
    let notifier = Notifier::new(sink, &config.alert);

    if config.once {
        let mut state = BotState::new();
        return if run_once(&fetcher, &notifier, &mut state).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let settings = RunSettings {
        schedule: config.schedule,
        error_backoff: config.error_backoff,
    };
    run_bot(&fetcher, &notifier, settings, shutdown_signal()).await;

    info!("Price bot stopped");
    ExitCode::SUCCESS
}
