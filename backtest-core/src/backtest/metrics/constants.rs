//! Annualization constants shared by the simulator and the calculators.

/// Trading days per year, used for volatility scaling and daily interest.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar days per year, used to annualize returns over elapsed dates.
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

pub const PERCENT: f64 = 100.0;

/// Decimal places for money and percentages.
pub const MONEY_DP: u32 = 2;

/// Decimal places for risk-adjusted ratios.
pub const RATIO_DP: u32 = 4;

/// Decimal places for share counts.
pub const SHARES_DP: u32 = 6;
