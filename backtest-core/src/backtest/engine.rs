// backtest/engine.rs

use super::errors::BacktestError;
use super::metrics::constants::{MONEY_DP, SHARES_DP, TRADING_DAYS_PER_YEAR};
use super::metrics::math::round_dp;
use super::types::{FinalState, SimulationConfig, SimulationResult, TimeSeries, TradeRecord};
use backtest_common::data::{DividendEvent, PricePoint, Signal, SignalAction};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Running, unrounded portfolio state carried from one day to the next.
#[derive(Debug, Clone, Default)]
struct PortfolioState {
    cash: f64,
    shares: f64,
    total_invested: f64,
    total_dividends: f64,
    total_transaction_costs: f64,
}

/// Single-asset, buy-only portfolio simulator.
///
/// Each price date is folded in four steps: dividends, signals, cash
/// interest, valuation. Output values are rounded; the carried state is not.
#[derive(Debug, Clone)]
pub struct PortfolioSimulator {
    config: SimulationConfig,
}

impl PortfolioSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation over `prices`, which must be in ascending date
    /// order. Fails only when `prices` is empty.
    pub fn run(
        &self,
        prices: &[PricePoint],
        signals: &[Signal],
        dividends: &[DividendEvent],
    ) -> Result<SimulationResult, BacktestError> {
        let Some(last_point) = prices.last() else {
            return Err(BacktestError::InsufficientData(
                "price_data must not be empty".to_string(),
            ));
        };

        info!(
            "Starting simulation: {} price points, {} signals, {} dividends",
            prices.len(),
            signals.len(),
            dividends.len()
        );

        let mut signals_by_date: HashMap<NaiveDate, Vec<&Signal>> = HashMap::new();
        for signal in signals {
            signals_by_date.entry(signal.date).or_default().push(signal);
        }
        // a later event on the same ex_date replaces an earlier one
        let dividend_by_date: HashMap<NaiveDate, f64> = dividends
            .iter()
            .map(|d| (d.ex_date, d.amount_per_share))
            .collect();

        let daily_interest_factor = if self.config.cash_interest_rate_pct > 0.0 {
            let daily_rate = (1.0 + self.config.cash_interest_rate_pct)
                .powf(1.0 / TRADING_DAYS_PER_YEAR)
                - 1.0;
            Some(1.0 + daily_rate)
        } else {
            None
        };

        let mut state = PortfolioState {
            cash: self.config.initial_capital,
            ..PortfolioState::default()
        };
        let mut series = TimeSeries::with_capacity(prices.len());
        let mut trades = Vec::new();

        for point in prices {
            let price = point.adjusted_close;

            if let Some(&amount_per_share) = dividend_by_date.get(&point.date) {
                self.apply_dividend(&mut state, amount_per_share, price);
            }

            if let Some(todays_signals) = signals_by_date.get(&point.date) {
                for signal in todays_signals {
                    if let Some(trade) = self.execute_signal(&mut state, signal, point) {
                        debug!(
                            "Executed trade: {} {} {} @ {}",
                            trade.date, trade.action, trade.shares, trade.price
                        );
                        trades.push(trade);
                    }
                }
            }

            if let Some(factor) = daily_interest_factor {
                state.cash *= factor;
            }

            let holdings_value = state.shares * price;
            let portfolio_value = state.cash + holdings_value;

            series.dates.push(point.date);
            series.portfolio_value.push(round_dp(portfolio_value, MONEY_DP));
            series.holdings_value.push(round_dp(holdings_value, MONEY_DP));
            series.cash_balance.push(round_dp(state.cash, MONEY_DP));
            series.shares_held.push(round_dp(state.shares, SHARES_DP));
            series
                .cumulative_invested
                .push(round_dp(state.total_invested, MONEY_DP));
            series
                .cumulative_dividends
                .push(round_dp(state.total_dividends, MONEY_DP));
        }

        let final_holdings = state.shares * last_point.adjusted_close;
        let final_state = FinalState {
            total_shares: round_dp(state.shares, SHARES_DP),
            cash_balance: round_dp(state.cash, MONEY_DP),
            holdings_value: round_dp(final_holdings, MONEY_DP),
            portfolio_value: round_dp(state.cash + final_holdings, MONEY_DP),
            total_invested: round_dp(state.total_invested, MONEY_DP),
            total_dividends_received: round_dp(state.total_dividends, MONEY_DP),
            total_transaction_costs: round_dp(state.total_transaction_costs, MONEY_DP),
        };

        info!(
            "Simulation completed: {} trades, final portfolio value {}",
            trades.len(),
            final_state.portfolio_value
        );

        Ok(SimulationResult {
            time_series: series,
            trades,
            final_state,
        })
    }

    fn apply_dividend(&self, state: &mut PortfolioState, amount_per_share: f64, price: f64) {
        if state.shares <= 0.0 {
            return;
        }
        let payment = state.shares * amount_per_share;
        state.total_dividends += payment;

        if self.config.reinvest_dividends && price > 0.0 {
            state.shares += payment / price;
        } else {
            if self.config.reinvest_dividends {
                warn!("Non-positive price {}, dividend kept as cash", price);
            }
            state.cash += payment;
        }
    }

    /// Buy `investment_per_trade` worth of shares if the full amount is
    /// available in cash. The whole gross amount leaves cash; only the amount
    /// net of transaction cost buys shares.
    fn execute_signal(
        &self,
        state: &mut PortfolioState,
        signal: &Signal,
        point: &PricePoint,
    ) -> Option<TradeRecord> {
        if signal.action != SignalAction::Buy {
            debug!("Ignoring {} signal on {}", signal.action, signal.date);
            return None;
        }

        let price = point.adjusted_close;
        let invest_amount = self.config.investment_per_trade;
        if !(state.cash >= invest_amount && invest_amount > 0.0 && price > 0.0) {
            debug!(
                "Skipping buy on {}: cash {:.2}, amount {:.2}, price {}",
                point.date, state.cash, invest_amount, price
            );
            return None;
        }

        let transaction_cost = invest_amount * self.config.transaction_cost_pct;
        let net_invest = invest_amount - transaction_cost;
        if net_invest <= 0.0 {
            debug!(
                "Skipping buy on {}: transaction cost {:.2} consumes the whole amount",
                point.date, transaction_cost
            );
            return None;
        }

        let shares_bought = net_invest / price;
        state.shares += shares_bought;
        state.cash -= invest_amount;
        state.total_invested += invest_amount;
        state.total_transaction_costs += transaction_cost;

        Some(TradeRecord {
            date: point.date,
            action: SignalAction::Buy,
            ticker: None,
            shares: round_dp(shares_bought, SHARES_DP),
            price: round_dp(price, MONEY_DP),
            amount: round_dp(invest_amount, MONEY_DP),
            transaction_cost: round_dp(transaction_cost, MONEY_DP),
            trigger: None,
        })
    }
}
