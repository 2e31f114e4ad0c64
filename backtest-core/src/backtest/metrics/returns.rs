//! Total and annualized return of a value series.

use super::constants::{CALENDAR_DAYS_PER_YEAR, MONEY_DP, PERCENT};
use super::math::round_dp;
use crate::backtest::types::ReturnMetrics;
use chrono::NaiveDate;

/// Compute total and annualized return (both percentages, 2 dp).
///
/// `start_date`/`end_date` replace the first/last date when measuring the
/// elapsed period for annualization. Malformed input (empty or mismatched
/// arrays, zero starting value) yields zeros instead of an error.
pub fn calculate_returns(
    dates: &[NaiveDate],
    values: &[f64],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> ReturnMetrics {
    let (Some(&first_date), Some(&last_date)) = (dates.first(), dates.last()) else {
        return ReturnMetrics::default();
    };
    if dates.len() != values.len() {
        return ReturnMetrics::default();
    }

    let initial_value = values[0];
    let final_value = values[values.len() - 1];
    if initial_value == 0.0 {
        return ReturnMetrics::default();
    }

    let total_return = (final_value - initial_value) / initial_value;

    let period_start = start_date.unwrap_or(first_date);
    let period_end = end_date.unwrap_or(last_date);
    let elapsed_days = (period_end - period_start).num_days();

    let annualized_return_pct = if elapsed_days <= 0 || values.len() < 2 {
        0.0
    } else {
        let growth = final_value / initial_value;
        let annualized = growth.powf(CALENDAR_DAYS_PER_YEAR / elapsed_days as f64) - 1.0;
        // negative growth to a fractional power, or overflow
        if annualized.is_finite() {
            round_dp(annualized * PERCENT, MONEY_DP)
        } else {
            0.0
        }
    };

    ReturnMetrics {
        total_return_pct: round_dp(total_return * PERCENT, MONEY_DP),
        annualized_return_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_total_return() {
        let dates = [date("2024-01-01"), date("2024-01-02"), date("2024-01-03")];
        let result = calculate_returns(&dates, &[100.0, 90.0, 112.346], None, None);
        assert_eq!(result.total_return_pct, 12.35);
    }

    #[test]
    fn test_sharp_move_over_short_window_is_not_zeroed() {
        let dates = [date("2024-01-01"), date("2024-01-02")];
        let result = calculate_returns(&dates, &[100.0, 130.0], None, None);
        assert_eq!(result.total_return_pct, 30.0);

        // 1.3^365 is far beyond Decimal's range
        let expected = (1.3f64.powf(365.0) - 1.0) * 100.0;
        assert!(result.annualized_return_pct > 1e40);
        assert!((result.annualized_return_pct / expected - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_year_growth_annualizes_to_itself() {
        let dates = [date("2023-01-01"), date("2024-01-01")];
        let result = calculate_returns(&dates, &[100.0, 121.0], None, None);
        assert_eq!(result.total_return_pct, 21.0);
        assert_eq!(result.annualized_return_pct, 21.0);
    }

    #[test]
    fn test_date_overrides_change_elapsed_period() {
        let dates = [date("2023-07-01"), date("2024-01-01")];
        // Same growth spread over two years instead of half a year
        let result = calculate_returns(
            &dates,
            &[100.0, 121.0],
            Some(date("2022-01-01")),
            Some(date("2024-01-01")),
        );
        assert_eq!(result.total_return_pct, 21.0);
        assert_eq!(result.annualized_return_pct, 10.0);
    }

    #[test]
    fn test_degenerate_inputs_yield_zero() {
        let zero = ReturnMetrics::default();
        assert_eq!(calculate_returns(&[], &[], None, None), zero);

        let dates = [date("2024-01-01"), date("2024-01-02")];
        assert_eq!(calculate_returns(&dates, &[100.0], None, None), zero);
        assert_eq!(calculate_returns(&dates, &[0.0, 50.0], None, None), zero);
    }

    #[test]
    fn test_single_point_or_non_positive_period() {
        let single = calculate_returns(&[date("2024-01-01")], &[100.0], None, None);
        assert_eq!(single, ReturnMetrics::default());

        let dates = [date("2024-01-01"), date("2024-01-05")];
        let inverted = calculate_returns(
            &dates,
            &[100.0, 110.0],
            Some(date("2024-02-01")),
            None,
        );
        assert_eq!(inverted.total_return_pct, 10.0);
        assert_eq!(inverted.annualized_return_pct, 0.0);
    }

    #[test]
    fn test_negative_growth_degrades_to_zero() {
        let dates = [date("2024-01-01"), date("2024-03-01")];
        let result = calculate_returns(&dates, &[100.0, -20.0], None, None);
        assert_eq!(result.total_return_pct, -120.0);
        assert_eq!(result.annualized_return_pct, 0.0);
    }
}
