//! Metrics for one or more labeled value series.

use super::comparison::calculate_comparison;
use super::returns::calculate_returns;
use super::risk::calculate_risk_metrics;
use crate::backtest::errors::BacktestError;
use crate::backtest::types::{MetricsReport, MetricsSet, NamedMetrics, NamedSeries};
use chrono::NaiveDate;
use tracing::debug;

pub const ACTIVE_LABEL: &str = "active";
pub const BASELINE_LABEL: &str = "baseline";

/// Runs the returns and risk calculators with one shared set of parameters.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    risk_free_rate_annual: f64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risk_free_rate(mut self, rate_annual: f64) -> Self {
        self.risk_free_rate_annual = rate_annual;
        self
    }

    /// Override the first/last dates used for annualization.
    pub fn with_period(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn calculate(&self, dates: &[NaiveDate], values: &[f64]) -> MetricsSet {
        let returns = calculate_returns(dates, values, self.start_date, self.end_date);
        let risk = calculate_risk_metrics(
            dates,
            values,
            self.risk_free_rate_annual,
            self.start_date,
            self.end_date,
        );
        MetricsSet::from_parts(returns, risk)
    }

    /// Metrics for every series in caller order, plus a comparison.
    ///
    /// "active" vs "baseline" is compared when both labels exist. Otherwise
    /// the first two series are compared, the first one as the active side.
    pub fn calculate_portfolios(
        &self,
        portfolios: &[NamedSeries],
    ) -> Result<MetricsReport, BacktestError> {
        if portfolios.is_empty() {
            return Err(BacktestError::InvalidRequest(
                "portfolios must be provided".to_string(),
            ));
        }

        let results: Vec<NamedMetrics> = portfolios
            .iter()
            .map(|p| {
                let metrics = self.calculate(&p.dates, &p.portfolio_value);
                debug!(
                    "Metrics for {}: total return {}%, max drawdown {}%",
                    p.name, metrics.total_return_pct, metrics.max_drawdown_pct
                );
                NamedMetrics {
                    name: p.name.clone(),
                    metrics,
                }
            })
            .collect();

        let find = |label: &str| results.iter().find(|r| r.name == label).map(|r| &r.metrics);
        let comparison = match (find(ACTIVE_LABEL), find(BASELINE_LABEL)) {
            (Some(active), Some(baseline)) => Some(calculate_comparison(active, baseline)),
            _ => match results.as_slice() {
                [first, second, ..] => Some(calculate_comparison(&first.metrics, &second.metrics)),
                _ => None,
            },
        };

        Ok(MetricsReport {
            portfolios: results,
            comparison,
        })
    }
}
