//! Price data structures for polled ticker data.

use crate::Exchange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal: {0:?}")]
pub struct InvalidDecimal(pub String);

/// Parse a decimal from its textual form.
/// Accepts plain ("1.234") and scientific ("1.2e-5") notation. Negative
/// exponents beyond the 28-digit scale round toward zero.
pub fn parse_decimal(text: &str) -> Result<Decimal, InvalidDecimal> {
    let text = text.trim();
    if let Ok(value) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Ok(value);
    }

    let invalid = || InvalidDecimal(text.to_string());
    let (mantissa, exponent) = text
        .split_once(|c: char| c == 'e' || c == 'E')
        .ok_or_else(invalid)?;
    let mantissa = Decimal::from_str(mantissa).map_err(|_| invalid())?;
    let exponent: i64 = exponent.parse().map_err(|_| invalid())?;
    if exponent >= 0 {
        return Err(invalid());
    }
    if exponent < -MAX_UNDERFLOW_SHIFT {
        return Ok(Decimal::ZERO);
    }
    Ok(shift_down(mantissa, exponent.unsigned_abs()))
}

/// Past this many places any mantissa is below the smallest representable step.
const MAX_UNDERFLOW_SHIFT: i64 = 60;

fn shift_down(mut value: Decimal, places: u64) -> Decimal {
    for _ in 0..places {
        if value.is_zero() {
            break;
        }
        value = value.checked_div(Decimal::TEN).unwrap_or(Decimal::ZERO);
    }
    value
}

/// Relative change in percent: (current - reference) / reference * 100.
/// Returns None when the reference is zero or the result overflows.
pub fn percent_change(current: Decimal, reference: Decimal) -> Option<Decimal> {
    current
        .checked_sub(reference)?
        .checked_div(reference)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Convert a fraction (0.0123) into a percentage (1.23).
/// Returns None on overflow.
#[inline]
pub fn fraction_to_percent(fraction: Decimal) -> Option<Decimal> {
    fraction.checked_mul(Decimal::ONE_HUNDRED)
}

/// Price and change as parsed from one ticker response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Last traded price
    pub price: Decimal,
    /// 24h change in percent (1.5 means +1.5%)
    pub change_percent: Decimal,
}

impl TickerSnapshot {
    pub fn new(price: Decimal, change_percent: Decimal) -> Self {
        Self {
            price,
            change_percent,
        }
    }

    /// Attach the source that produced this snapshot.
    pub fn from_source(self, source: Exchange) -> Quote {
        Quote {
            price: self.price,
            change_percent: self.change_percent,
            source,
        }
    }
}

/// A quote for one poll cycle. Produced fresh each poll, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub price: Decimal,
    pub change_percent: Decimal,
    /// Source that answered first
    pub source: Exchange,
}

impl Quote {
    pub fn new(price: Decimal, change_percent: Decimal, source: Exchange) -> Self {
        Self {
            price,
            change_percent,
            source,
        }
    }
}
