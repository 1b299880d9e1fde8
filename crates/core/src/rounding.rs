use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to `places` decimal places, ties to even.
///
/// Rounds the exact binary value of the float, so `2.675` (stored as
/// 2.67499...) gives `2.67` while a true tie such as `6.25` gives `6.2`.
/// Values outside the decimal range are returned unchanged.
pub fn round_dp(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
