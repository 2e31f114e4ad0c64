//! Statistical helpers for the metric calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to `dp` decimal places using the exact decimal expansion of
/// the float and half-to-even ties. NaN and infinities yield 0. Finite values
/// too large for `Decimal` carry no fractional digits and pass through as is.
///
/// The result goes back through the decimal string so that, e.g., `1.2346`
/// comes out as the nearest `f64` to the literal.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    match Decimal::from_f64_retain(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
            .to_string()
            .parse::<f64>()
            .unwrap_or(value),
        None => value,
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N), `0.0` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Simple period returns `v[i] / v[i-1] - 1`. A zero previous value yields a
/// zero return for that step.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|window| {
            if window[0] == 0.0 {
                0.0
            } else {
                window[1] / window[0] - 1.0
            }
        })
        .collect()
}
