//! Performance statistics of portfolio value series:
//! - total and annualized return
//! - annualized volatility, maximum drawdown and its duration
//! - Sharpe, Sortino and Calmar ratios
//! - active-vs-baseline comparison

pub mod calculator;
pub mod comparison;
pub mod constants;
pub mod math;
pub mod returns;
pub mod risk;

pub use calculator::{MetricsCalculator, ACTIVE_LABEL, BASELINE_LABEL};
pub use comparison::calculate_comparison;
pub use returns::calculate_returns;
pub use risk::{calculate_risk_metrics, max_drawdown, Drawdown};
