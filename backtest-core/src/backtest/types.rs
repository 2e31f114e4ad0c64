// backtest/types.rs

use super::errors::BacktestError;
use super::strategy::StrategyConfig;
use backtest_common::data::{DividendEvent, PricePoint, Signal, SignalAction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------

/// Scalar inputs of a portfolio simulation. Fractions are plain ratios
/// (0.01 == 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    pub investment_per_trade: f64,
    #[serde(default = "default_true")]
    pub reinvest_dividends: bool,
    #[serde(default)]
    pub transaction_cost_pct: f64,
    /// Annual rate paid on idle cash, compounded once per trading day.
    #[serde(default)]
    pub cash_interest_rate_pct: f64,
}

impl SimulationConfig {
    pub fn new(initial_capital: f64, investment_per_trade: f64) -> Self {
        Self {
            initial_capital,
            investment_per_trade,
            reinvest_dividends: true,
            transaction_cost_pct: 0.0,
            cash_interest_rate_pct: 0.0,
        }
    }

    pub fn with_reinvest_dividends(mut self, reinvest: bool) -> Self {
        self.reinvest_dividends = reinvest;
        self
    }

    pub fn with_transaction_cost_pct(mut self, pct: f64) -> Self {
        self.transaction_cost_pct = pct;
        self
    }

    pub fn with_cash_interest_rate_pct(mut self, pct: f64) -> Self {
        self.cash_interest_rate_pct = pct;
        self
    }

    /// Boundary validation for externally supplied parameters. The simulator
    /// itself does not call this; it tolerates any values.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !(self.initial_capital > 0.0) {
            return Err(BacktestError::InvalidRequest(
                "initial_capital must be greater than 0".to_string(),
            ));
        }
        if !(self.investment_per_trade > 0.0) {
            return Err(BacktestError::InvalidRequest(
                "investment_per_trade must be greater than 0".to_string(),
            ));
        }
        if !(self.transaction_cost_pct >= 0.0) {
            return Err(BacktestError::InvalidRequest(
                "transaction_cost_pct must not be negative".to_string(),
            ));
        }
        if !(self.cash_interest_rate_pct >= 0.0) {
            return Err(BacktestError::InvalidRequest(
                "cash_interest_rate_pct must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// An executed buy. `amount` is the gross cash debited; `transaction_cost` is
/// the part of it that did not buy shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: SignalAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub shares: f64,
    pub price: f64,
    pub amount: f64,
    pub transaction_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

/// Parallel per-day series, one entry per input price date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub portfolio_value: Vec<f64>,
    pub holdings_value: Vec<f64>,
    pub cash_balance: Vec<f64>,
    pub shares_held: Vec<f64>,
    pub cumulative_invested: Vec<f64>,
    pub cumulative_dividends: Vec<f64>,
}

impl TimeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dates: Vec::with_capacity(capacity),
            portfolio_value: Vec::with_capacity(capacity),
            holdings_value: Vec::with_capacity(capacity),
            cash_balance: Vec::with_capacity(capacity),
            shares_held: Vec::with_capacity(capacity),
            cumulative_invested: Vec::with_capacity(capacity),
            cumulative_dividends: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Snapshot after the last simulated day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    pub total_shares: f64,
    pub cash_balance: f64,
    pub holdings_value: f64,
    pub portfolio_value: f64,
    pub total_invested: f64,
    pub total_dividends_received: f64,
    pub total_transaction_costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub time_series: TimeSeries,
    pub trades: Vec<TradeRecord>,
    pub final_state: FinalState,
}

/// Self-contained simulation input, as read by the `simulate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    #[serde(flatten)]
    pub config: SimulationConfig,
    #[serde(default)]
    pub signals: Vec<Signal>,
    pub price_data: Vec<PricePoint>,
    #[serde(default)]
    pub dividend_data: Vec<DividendEvent>,
}

// ---------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub volatility_annualized_pct: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_duration_days: i64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
}

/// Return and risk statistics of one value series. Missing fields
/// deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSet {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    /// Always <= 0.
    pub max_drawdown_pct: f64,
    pub max_drawdown_duration_days: i64,
    pub volatility_annualized_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
}

impl MetricsSet {
    pub fn from_parts(returns: ReturnMetrics, risk: RiskMetrics) -> Self {
        Self {
            total_return_pct: returns.total_return_pct,
            annualized_return_pct: returns.annualized_return_pct,
            max_drawdown_pct: risk.max_drawdown_pct,
            max_drawdown_duration_days: risk.max_drawdown_duration_days,
            volatility_annualized_pct: risk.volatility_annualized_pct,
            sharpe_ratio: risk.sharpe_ratio,
            sortino_ratio: risk.sortino_ratio,
            calmar_ratio: risk.calmar_ratio,
        }
    }
}

/// Signed differences between an active and a baseline `MetricsSet`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    pub excess_return_pct: f64,
    pub excess_annualized_return_pct: f64,
    pub excess_sharpe: f64,
    pub reduced_max_drawdown_pct: f64,
    pub reduced_volatility_pct: f64,
}

/// A labeled value series handed to the metrics calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub portfolio_value: Vec<f64>,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, portfolio_value: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            dates,
            portfolio_value,
        }
    }

    pub fn from_time_series(name: impl Into<String>, series: &TimeSeries) -> Self {
        Self::new(name, series.dates.clone(), series.portfolio_value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMetrics {
    pub name: String,
    pub metrics: MetricsSet,
}

/// Input of the `metrics` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRequest {
    #[serde(default)]
    pub risk_free_rate_annual: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub portfolios: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub portfolios: Vec<NamedMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSet>,
}

impl MetricsReport {
    pub fn get(&self, name: &str) -> Option<&MetricsSet> {
        self.portfolios
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.metrics)
    }
}

// ---------------------------------------------------------------
// Backtest (active vs baseline)
// ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyParams {
    pub strategy_type: String,
    #[serde(default)]
    pub config: StrategyConfig,
}

/// The reference scenario: one buy-and-hold purchase of the whole capital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineParams {
    pub initial_capital: f64,
    #[serde(default = "default_true")]
    pub reinvest_dividends: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub ticker: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub strategy: StrategyParams,
    pub portfolio: SimulationConfig,
    pub baseline: BaselineParams,
    #[serde(default)]
    pub risk_free_rate_annual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetadata {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy_type: String,
    /// Wall-clock time spent in the run, fetch included.
    pub execution_time_ms: u64,
}

/// The market data the run was evaluated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub ticker: String,
    pub prices: Vec<PricePoint>,
    pub dividends: Vec<DividendEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub signals: Vec<Signal>,
    pub simulation: SimulationResult,
    pub metrics: MetricsSet,
    pub total_trades: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub metadata: BacktestMetadata,
    pub active: ScenarioReport,
    pub baseline: ScenarioReport,
    pub comparison: ComparisonSet,
    pub market_data: MarketData,
}
