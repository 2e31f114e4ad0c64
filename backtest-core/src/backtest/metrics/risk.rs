//! Volatility, drawdown and risk-adjusted ratios of a value series.

use super::constants::{MONEY_DP, PERCENT, RATIO_DP, TRADING_DAYS_PER_YEAR};
use super::math::{population_std_dev, round_dp, simple_returns};
use super::returns::calculate_returns;
use crate::backtest::types::RiskMetrics;
use chrono::NaiveDate;

/// Deepest peak-to-trough decline of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drawdown {
    /// Fraction of the peak lost at the trough, in `[0, 1]` for positive series.
    pub depth: f64,
    pub peak_index: usize,
    pub trough_index: usize,
}

/// Scan left to right keeping the running peak. Only a strictly deeper
/// drawdown replaces the current one, so ties keep the first occurrence.
pub fn max_drawdown(values: &[f64]) -> Drawdown {
    let mut worst = Drawdown::default();
    let Some(&first) = values.first() else {
        return worst;
    };

    let mut peak_value = first;
    let mut peak_index = 0;

    for (i, &value) in values.iter().enumerate() {
        if value > peak_value {
            peak_value = value;
            peak_index = i;
        }
        let drawdown = if peak_value > 0.0 {
            (peak_value - value) / peak_value
        } else {
            0.0
        };
        if drawdown > worst.depth {
            worst = Drawdown {
                depth: drawdown,
                peak_index,
                trough_index: i,
            };
        }
    }

    worst
}

/// Calendar days from the drawdown's peak until the series first gets back
/// to the peak value, or until the last date if it never does. Mismatched
/// slices or a drawdown lying outside them yield 0.
pub fn drawdown_duration_days(dates: &[NaiveDate], values: &[f64], drawdown: &Drawdown) -> i64 {
    if drawdown.depth <= 0.0 || dates.len() != values.len() {
        return 0;
    }
    let (Some(&peak_value), Some(&peak_date), Some(&last_date)) = (
        values.get(drawdown.peak_index),
        dates.get(drawdown.peak_index),
        dates.last(),
    ) else {
        return 0;
    };

    let recovery_date = values
        .iter()
        .zip(dates)
        .skip(drawdown.trough_index + 1)
        .find(|(&v, _)| v >= peak_value)
        .map(|(_, &date)| date)
        .unwrap_or(last_date);

    (recovery_date - peak_date).num_days()
}

/// Compute the risk block of a `MetricsSet`.
///
/// The annualized return feeding Sharpe, Sortino and Calmar comes from
/// [`calculate_returns`] with the same date overrides, so both calculators
/// always agree. Empty or mismatched input yields an all-zero block.
pub fn calculate_risk_metrics(
    dates: &[NaiveDate],
    values: &[f64],
    risk_free_rate_annual: f64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> RiskMetrics {
    if dates.is_empty() || dates.len() != values.len() {
        return RiskMetrics::default();
    }

    let daily_returns = simple_returns(values);
    let annualization = TRADING_DAYS_PER_YEAR.sqrt();
    let volatility = population_std_dev(&daily_returns) * annualization;

    let drawdown = max_drawdown(values);
    let duration_days = drawdown_duration_days(dates, values, &drawdown);

    let annualized_return =
        calculate_returns(dates, values, start_date, end_date).annualized_return_pct / PERCENT;
    let excess_return = annualized_return - risk_free_rate_annual;

    let sharpe = if volatility > 0.0 {
        excess_return / volatility
    } else {
        0.0
    };

    let downside: Vec<f64> = daily_returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_volatility = population_std_dev(&downside) * annualization;
    let sortino = if downside_volatility > 0.0 {
        excess_return / downside_volatility
    } else {
        0.0
    };

    let calmar = if drawdown.depth > 0.0 {
        annualized_return / drawdown.depth
    } else {
        0.0
    };

    RiskMetrics {
        volatility_annualized_pct: round_dp(volatility * PERCENT, MONEY_DP),
        // + 0.0 turns a flat series' -0.0 into 0.0
        max_drawdown_pct: round_dp(-drawdown.depth * PERCENT, MONEY_DP) + 0.0,
        max_drawdown_duration_days: duration_days,
        sharpe_ratio: round_dp(sharpe, RATIO_DP),
        sortino_ratio: round_dp(sortino, RATIO_DP),
        calmar_ratio: round_dp(calmar, RATIO_DP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn consecutive_dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| date("2024-01-01") + Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn test_flat_series_has_no_risk() {
        let dates = consecutive_dates(5);
        let metrics = calculate_risk_metrics(&dates, &[10_000.0; 5], 0.0, None, None);
        assert_eq!(metrics, RiskMetrics::default());
        assert!(metrics.max_drawdown_pct.is_sign_positive());
    }

    #[test]
    fn test_drawdown_with_recovery() {
        let dates = consecutive_dates(3);
        let metrics = calculate_risk_metrics(&dates, &[100.0, 80.0, 120.0], 0.0, None, None);
        assert_eq!(metrics.max_drawdown_pct, -20.0);
        assert_eq!(metrics.max_drawdown_duration_days, 2);
    }

    #[test]
    fn test_drawdown_without_recovery_runs_to_last_date() {
        let dates = consecutive_dates(4);
        let values = [100.0, 120.0, 90.0, 100.0];
        let drawdown = max_drawdown(&values);
        assert_eq!(drawdown.peak_index, 1);
        assert_eq!(drawdown.trough_index, 2);

        let metrics = calculate_risk_metrics(&dates, &values, 0.0, None, None);
        assert_eq!(metrics.max_drawdown_pct, -25.0);
        assert_eq!(metrics.max_drawdown_duration_days, 2);
    }

    #[test]
    fn test_duration_guards_against_foreign_slices() {
        let dates = consecutive_dates(4);
        let values = [100.0, 120.0, 90.0, 100.0];
        let drawdown = max_drawdown(&values);
        assert_eq!(drawdown_duration_days(&dates, &values, &drawdown), 2);

        assert_eq!(drawdown_duration_days(&dates[..2], &values, &drawdown), 0);
        assert_eq!(drawdown_duration_days(&dates[..2], &values[..2], &drawdown), 0);

        let outside = Drawdown {
            depth: 0.5,
            peak_index: 7,
            trough_index: 9,
        };
        assert_eq!(drawdown_duration_days(&dates, &values, &outside), 0);
    }

    #[test]
    fn test_huge_annualized_return_reaches_ratios() {
        let dates = consecutive_dates(3);
        let metrics = calculate_risk_metrics(&dates, &[100.0, 130.0, 200.0], 0.0, None, None);
        assert!(metrics.volatility_annualized_pct > 0.0);
        assert!(metrics.sharpe_ratio > 1e30);
    }

    #[test]
    fn test_equal_drawdowns_keep_first() {
        let dates = consecutive_dates(4);
        let values = [100.0, 90.0, 100.0, 90.0];
        let drawdown = max_drawdown(&values);
        assert_eq!((drawdown.peak_index, drawdown.trough_index), (0, 1));
        // recovered on day 2, not "still under water" until day 3
        assert_eq!(drawdown_duration_days(&dates, &values, &drawdown), 2);
    }

    #[test]
    fn test_ratios_use_annualized_return() {
        let dates = [
            date("2023-01-01"),
            date("2023-04-01"),
            date("2023-07-01"),
            date("2024-01-01"),
        ];
        let values = [100.0, 110.0, 99.0, 121.0];
        let metrics = calculate_risk_metrics(&dates, &values, 0.0, None, None);

        assert_eq!(metrics.max_drawdown_pct, -10.0);
        assert_eq!(metrics.max_drawdown_duration_days, 275);
        // annualized return is exactly 21% over 365 days
        assert_eq!(metrics.calmar_ratio, 2.1);
        // a single losing day has no dispersion
        assert_eq!(metrics.sortino_ratio, 0.0);

        let volatility = population_std_dev(&simple_returns(&values)) * 252f64.sqrt();
        assert!((metrics.volatility_annualized_pct - volatility * 100.0).abs() < 0.005);
        assert_eq!(metrics.sharpe_ratio, round_dp(0.21 / volatility, 4));
    }

    #[test]
    fn test_risk_free_rate_and_sortino() {
        let dates = [
            date("2023-01-01"),
            date("2023-02-01"),
            date("2023-03-01"),
            date("2024-01-01"),
        ];
        let values = [100.0, 90.0, 72.0, 110.0];
        let rf = 0.02;
        let metrics = calculate_risk_metrics(&dates, &values, rf, None, None);

        // downside returns are roughly -10% and -20%
        let downside = [90.0 / 100.0 - 1.0, 72.0 / 90.0 - 1.0];
        let downside_volatility = population_std_dev(&downside) * 252f64.sqrt();
        assert!((downside_volatility - 0.05 * 252f64.sqrt()).abs() < 1e-9);
        let annualized = calculate_returns(&dates, &values, None, None).annualized_return_pct / 100.0;
        assert_eq!(annualized, 0.1);
        assert_eq!(
            metrics.sortino_ratio,
            round_dp((annualized - rf) / downside_volatility, 4)
        );
        assert!(metrics.sharpe_ratio > 0.0);
    }

    #[test]
    fn test_malformed_input_yields_zero_block() {
        let dates = consecutive_dates(3);
        assert_eq!(
            calculate_risk_metrics(&dates, &[100.0, 90.0], 0.0, None, None),
            RiskMetrics::default()
        );
        assert_eq!(
            calculate_risk_metrics(&[], &[], 0.0, None, None),
            RiskMetrics::default()
        );
    }

    #[test]
    fn test_single_value() {
        let metrics = calculate_risk_metrics(&consecutive_dates(1), &[100.0], 0.0, None, None);
        assert_eq!(metrics, RiskMetrics::default());
    }

    #[test]
    fn test_drawdown_is_zero_only_for_non_decreasing_series() {
        let dates = consecutive_dates(6);
        let rising = [1.0, 2.0, 2.0, 3.0, 5.0, 5.0];
        assert_eq!(
            calculate_risk_metrics(&dates, &rising, 0.0, None, None).max_drawdown_pct,
            0.0
        );
        let dipping = [1.0, 2.0, 1.99, 3.0, 5.0, 5.0];
        assert!(calculate_risk_metrics(&dates, &dipping, 0.0, None, None).max_drawdown_pct < 0.0);
    }
}
