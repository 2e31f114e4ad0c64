pub mod engine;
pub mod errors;
pub mod metrics;
pub mod runner;
pub mod strategy;
pub mod types;

pub use engine::PortfolioSimulator;
pub use errors::BacktestError;
pub use metrics::MetricsCalculator;
pub use runner::BacktestRunner;
pub use strategy::{create_strategy, list_strategies, SignalGenerator, Strategy, StrategyInfo};
pub use types::*;
