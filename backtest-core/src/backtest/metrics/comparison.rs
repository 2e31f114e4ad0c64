//! Relative performance of an active scenario against a baseline.

use super::constants::{MONEY_DP, RATIO_DP};
use super::math::round_dp;
use crate::backtest::types::{ComparisonSet, MetricsSet};

/// Difference two metric sets. Every field is `active - baseline` except the
/// `reduced_*` ones, which are `baseline - active`. Since drawdowns are <= 0,
/// a shallower active drawdown makes `reduced_max_drawdown_pct` negative.
pub fn calculate_comparison(active: &MetricsSet, baseline: &MetricsSet) -> ComparisonSet {
    ComparisonSet {
        excess_return_pct: round_dp(active.total_return_pct - baseline.total_return_pct, MONEY_DP),
        excess_annualized_return_pct: round_dp(
            active.annualized_return_pct - baseline.annualized_return_pct,
            MONEY_DP,
        ),
        excess_sharpe: round_dp(active.sharpe_ratio - baseline.sharpe_ratio, RATIO_DP),
        reduced_max_drawdown_pct: round_dp(
            baseline.max_drawdown_pct - active.max_drawdown_pct,
            MONEY_DP,
        ),
        reduced_volatility_pct: round_dp(
            baseline.volatility_annualized_pct - active.volatility_annualized_pct,
            MONEY_DP,
        ),
    }
}
