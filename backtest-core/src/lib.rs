//! Backtesting toolkit: a day-by-day portfolio simulator plus the return,
//! risk and comparison statistics derived from its value series.

pub mod backtest;
pub mod config;
