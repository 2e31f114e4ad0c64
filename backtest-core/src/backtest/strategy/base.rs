use backtest_common::data::{PricePoint, Signal};
use serde::{Deserialize, Serialize};

/// Produces buy signals from a price history.
pub trait SignalGenerator {
    /// Configuration tag used to select the strategy.
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn generate_signals(&self, prices: &[PricePoint]) -> Vec<Signal>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl StrategyInfo {
    pub fn of(generator: &impl SignalGenerator) -> Self {
        Self {
            id: generator.id().to_string(),
            name: generator.name().to_string(),
            description: generator.description().to_string(),
        }
    }
}

/// Tunables accepted by the strategies. Fields a strategy does not use are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Fractional price change that triggers a dip buy, e.g. -0.05.
    #[serde(default)]
    pub price_change_threshold: Option<f64>,
    /// "daily", "weekly" or "monthly".
    #[serde(default)]
    pub lookback_period: Option<String>,
}
