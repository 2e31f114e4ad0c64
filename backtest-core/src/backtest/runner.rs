// backtest/runner.rs

use super::engine::PortfolioSimulator;
use super::errors::BacktestError;
use super::metrics::{MetricsCalculator, ACTIVE_LABEL, BASELINE_LABEL};
use super::strategy::{create_strategy, BuyAndHold, SignalGenerator};
use super::types::{
    BacktestMetadata, BacktestReport, BacktestRequest, MarketData, NamedSeries, ScenarioReport,
    SimulationConfig, SimulationResult,
};
use backtest_common::data::{MarketDataSource, Signal};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Runs a strategy and a buy-and-hold baseline over the same market data and
/// compares them.
pub struct BacktestRunner<'a> {
    source: &'a dyn MarketDataSource,
}

impl<'a> BacktestRunner<'a> {
    pub fn new(source: &'a dyn MarketDataSource) -> Self {
        Self { source }
    }

    pub fn run(&self, request: &BacktestRequest) -> Result<BacktestReport, BacktestError> {
        let started = Instant::now();
        validate_request(request)?;
        let strategy = create_strategy(&request.strategy.strategy_type, &request.strategy.config)?;

        info!(
            "Starting backtest: strategy={}, ticker={}",
            strategy.id(),
            request.ticker
        );

        let prices = self
            .source
            .prices(&request.ticker, request.start_date, request.end_date)?;
        let (Some(first_date), Some(last_date)) =
            (prices.first().map(|p| p.date), prices.last().map(|p| p.date))
        else {
            return Err(BacktestError::InsufficientData(format!(
                "No price data available for {} in the requested range",
                request.ticker
            )));
        };
        let dividends = self
            .source
            .dividends(&request.ticker, request.start_date, request.end_date)?;
        info!(
            "Loaded {} price points and {} dividends",
            prices.len(),
            dividends.len()
        );

        let active_signals = strategy.generate_signals(&prices);
        let baseline_signals = BuyAndHold.generate_signals(&prices);

        let mut active = PortfolioSimulator::new(request.portfolio.clone()).run(
            &prices,
            &active_signals,
            &dividends,
        )?;
        let baseline_config =
            SimulationConfig::new(request.baseline.initial_capital, request.baseline.initial_capital)
                .with_reinvest_dividends(request.baseline.reinvest_dividends);
        let baseline =
            PortfolioSimulator::new(baseline_config).run(&prices, &baseline_signals, &dividends)?;

        annotate_trades(&mut active, &request.ticker, &active_signals);

        let calculator = MetricsCalculator::new()
            .with_risk_free_rate(request.risk_free_rate_annual)
            .with_period(request.start_date, request.end_date);
        let report = calculator.calculate_portfolios(&[
            NamedSeries::from_time_series(ACTIVE_LABEL, &active.time_series),
            NamedSeries::from_time_series(BASELINE_LABEL, &baseline.time_series),
        ])?;
        let active_metrics = report.get(ACTIVE_LABEL).copied().unwrap_or_default();
        let baseline_metrics = report.get(BASELINE_LABEL).copied().unwrap_or_default();
        let comparison = report.comparison.unwrap_or_default();

        info!(
            "Backtest completed: active {:.2}% vs baseline {:.2}% ({} trades)",
            active_metrics.total_return_pct,
            baseline_metrics.total_return_pct,
            active.trades.len()
        );

        Ok(BacktestReport {
            metadata: BacktestMetadata {
                ticker: request.ticker.clone(),
                start_date: request.start_date.unwrap_or(first_date),
                end_date: request.end_date.unwrap_or(last_date),
                strategy_type: strategy.id().to_string(),
                execution_time_ms: u64::try_from(started.elapsed().as_millis())
                    .unwrap_or(u64::MAX),
            },
            active: ScenarioReport {
                total_trades: active.trades.len(),
                signals: active_signals,
                simulation: active,
                metrics: active_metrics,
            },
            baseline: ScenarioReport {
                total_trades: baseline.trades.len(),
                signals: baseline_signals,
                simulation: baseline,
                metrics: baseline_metrics,
            },
            comparison,
            market_data: MarketData {
                ticker: request.ticker.clone(),
                prices,
                dividends,
            },
        })
    }
}

fn validate_request(request: &BacktestRequest) -> Result<(), BacktestError> {
    if request.ticker.trim().is_empty() {
        return Err(BacktestError::InvalidRequest(
            "ticker must not be empty".to_string(),
        ));
    }
    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if start > end {
            return Err(BacktestError::InvalidRequest(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
    }
    request.portfolio.validate()?;
    if !(request.baseline.initial_capital > 0.0) {
        return Err(BacktestError::InvalidRequest(
            "baseline initial_capital must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Stamp each trade with the ticker and the trigger of the signal raised on
/// its date (the last one wins when several share a date).
fn annotate_trades(result: &mut SimulationResult, ticker: &str, signals: &[Signal]) {
    let triggers: HashMap<NaiveDate, &str> = signals
        .iter()
        .filter_map(|s| s.trigger.as_deref().map(|t| (s.date, t)))
        .collect();

    for trade in &mut result.trades {
        trade.ticker = Some(ticker.to_string());
        trade.trigger = triggers.get(&trade.date).map(|t| t.to_string());
    }
}
