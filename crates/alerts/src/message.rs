//! Price message formatting.

use crate::dedupe::BotState;
use pricebot_core::Quote;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction marker shown next to the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }

    /// Up for non-negative change, Down otherwise.
    pub fn from_change(change_percent: Decimal) -> Self {
        if change_percent >= Decimal::ZERO {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// How the arrow is chosen relative to the last sent quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowPolicy {
    /// Compare price with the last sent price; ties and first quote follow the change sign.
    #[default]
    PriceThenChange,
    /// Compare price with the last sent price; ties point up, first quote follows the change sign.
    PriceThenUp,
    /// Follow the change sign only.
    ChangeSign,
}

impl ArrowPolicy {
    pub fn direction(self, quote: &Quote, state: &BotState) -> Direction {
        let by_change = Direction::from_change(quote.change_percent);
        let previous = match (self, state.last_sent_price) {
            (ArrowPolicy::ChangeSign, _) | (_, None) => return by_change,
            (_, Some(previous)) => previous,
        };

        if quote.price > previous {
            Direction::Up
        } else if quote.price < previous {
            Direction::Down
        } else if self == ArrowPolicy::PriceThenUp {
            Direction::Up
        } else {
            by_change
        }
    }
}

impl FromStr for ArrowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-then-change" | "price" => Ok(ArrowPolicy::PriceThenChange),
            "price-then-up" => Ok(ArrowPolicy::PriceThenUp),
            "change-sign" | "change" => Ok(ArrowPolicy::ChangeSign),
            other => Err(format!("unknown arrow policy: {}", other)),
        }
    }
}

/// Price truncated (never rounded up) to exactly 3 decimals.
pub fn format_price(price: Decimal) -> String {
    let truncated = price.round_dp_with_strategy(3, RoundingStrategy::ToZero);
    format!("{:.3}", truncated)
}

/// Change with 2 decimals. `+` only for strictly positive values; negative
/// values carry their own single `-`.
pub fn format_change(change_percent: Decimal) -> String {
    let magnitude = change_percent
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let sign = if change_percent > Decimal::ZERO {
        "+"
    } else if change_percent < Decimal::ZERO {
        "-"
    } else {
        ""
    };
    format!("{}{:.2}", sign, magnitude)
}

/// Render `$<price> <arrow> [<change>%]`.
pub fn compose_message(quote: &Quote, direction: Direction) -> String {
    format!(
        "${} {} [{}%]",
        format_price(quote.price),
        direction.glyph(),
        format_change(quote.change_percent)
    )
}
