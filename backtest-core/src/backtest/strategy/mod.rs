// backtest/strategy/mod.rs
pub mod base;
pub mod buy_and_hold;
pub mod buy_the_dip;

pub use base::{SignalGenerator, StrategyConfig, StrategyInfo};
pub use buy_and_hold::{BuyAndHold, BUY_AND_HOLD_ID};
pub use buy_the_dip::{BuyTheDip, LookbackPeriod, BUY_THE_DIP_ID};

use super::errors::BacktestError;
use backtest_common::data::{PricePoint, Signal};

/// The closed set of available strategies, selected by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    BuyAndHold(BuyAndHold),
    BuyTheDip(BuyTheDip),
}

impl SignalGenerator for Strategy {
    fn id(&self) -> &'static str {
        match self {
            Strategy::BuyAndHold(s) => s.id(),
            Strategy::BuyTheDip(s) => s.id(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::BuyAndHold(s) => s.name(),
            Strategy::BuyTheDip(s) => s.name(),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Strategy::BuyAndHold(s) => s.description(),
            Strategy::BuyTheDip(s) => s.description(),
        }
    }

    fn generate_signals(&self, prices: &[PricePoint]) -> Vec<Signal> {
        match self {
            Strategy::BuyAndHold(s) => s.generate_signals(prices),
            Strategy::BuyTheDip(s) => s.generate_signals(prices),
        }
    }
}

/// Build the strategy registered under `id`.
pub fn create_strategy(id: &str, config: &StrategyConfig) -> Result<Strategy, BacktestError> {
    match id {
        BUY_AND_HOLD_ID => Ok(Strategy::BuyAndHold(BuyAndHold)),
        BUY_THE_DIP_ID => Ok(Strategy::BuyTheDip(BuyTheDip::from_config(config))),
        _ => Err(BacktestError::StrategyNotFound {
            strategy: id.to_string(),
            supported: list_strategies().into_iter().map(|s| s.id).collect(),
        }),
    }
}

pub fn list_strategies() -> Vec<StrategyInfo> {
    vec![
        StrategyInfo::of(&BuyAndHold),
        StrategyInfo::of(&BuyTheDip::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_strategies() {
        let config = StrategyConfig {
            price_change_threshold: Some(-0.08),
            lookback_period: Some("weekly".to_string()),
        };
        let strategy = create_strategy("buy_the_dip", &config).unwrap();
        assert_eq!(
            strategy,
            Strategy::BuyTheDip(BuyTheDip::new(-0.08, LookbackPeriod::Weekly))
        );
        assert_eq!(strategy.id(), BUY_THE_DIP_ID);

        let strategy = create_strategy("buy_and_hold", &config).unwrap();
        assert_eq!(strategy.name(), "Buy and Hold");
    }

    #[test]
    fn test_unknown_strategy_lists_supported_ids() {
        let err = create_strategy("momentum", &StrategyConfig::default()).unwrap_err();
        match err {
            BacktestError::StrategyNotFound {
                strategy,
                supported,
            } => {
                assert_eq!(strategy, "momentum");
                assert_eq!(supported, vec!["buy_and_hold", "buy_the_dip"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_strategies() {
        let ids: Vec<String> = list_strategies().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![BUY_AND_HOLD_ID, BUY_THE_DIP_ID]);
    }
}
