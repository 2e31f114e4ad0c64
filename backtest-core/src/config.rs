// config.rs

use crate::backtest::strategy::StrategyConfig;
use crate::backtest::types::SimulationConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    pub initial_capital: f64,
    pub investment_per_trade: f64,
    pub reinvest_dividends: bool,
    pub transaction_cost_pct: f64,
    pub cash_interest_rate_pct: f64,
    pub baseline_initial_capital: f64,
}

impl SimulationSettings {
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig::new(self.initial_capital, self.investment_per_trade)
            .with_reinvest_dividends(self.reinvest_dividends)
            .with_transaction_cost_pct(self.transaction_cost_pct)
            .with_cash_interest_rate_pct(self.cash_interest_rate_pct)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub risk_free_rate_annual: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategySettings {
    pub default_strategy: String,
    pub price_change_threshold: f64,
    pub lookback_period: String,
}

impl StrategySettings {
    pub fn to_config(&self) -> StrategyConfig {
        StrategyConfig {
            price_change_threshold: Some(self.price_change_threshold),
            lookback_period: Some(self.lookback_period.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub simulation: SimulationSettings,
    pub metrics: MetricsSettings,
    pub strategy: StrategySettings,
}

impl Settings {
    /// Load settings for `RUN_MODE` (default `development`) from `./config`.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load(Path::new("config"), &run_mode)
    }

    /// Defaults, then `<config_dir>/<run_mode>.*` if present, then
    /// `BACKTEST__SECTION__KEY` environment variables.
    pub fn load(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let file = config_dir.join(run_mode);
        let s = Config::builder()
            .set_default("simulation.initial_capital", 10_000.0)?
            .set_default("simulation.investment_per_trade", 1_000.0)?
            .set_default("simulation.reinvest_dividends", true)?
            .set_default("simulation.transaction_cost_pct", 0.0)?
            .set_default("simulation.cash_interest_rate_pct", 0.0)?
            .set_default("simulation.baseline_initial_capital", 10_000.0)?
            .set_default("metrics.risk_free_rate_annual", 0.02)?
            .set_default("strategy.default_strategy", "buy_the_dip")?
            .set_default("strategy.price_change_threshold", -0.05)?
            .set_default("strategy.lookback_period", "daily")?
            .add_source(File::with_name(&file.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("BACKTEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // environment variables are process-wide; loaders must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_without_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let settings = Settings::load(dir.path(), "missing").unwrap();

        assert_eq!(settings.simulation.initial_capital, 10_000.0);
        assert_eq!(settings.simulation.investment_per_trade, 1_000.0);
        assert!(settings.simulation.reinvest_dividends);
        assert_eq!(settings.metrics.risk_free_rate_annual, 0.02);
        assert_eq!(settings.strategy.default_strategy, "buy_the_dip");
        assert_eq!(settings.strategy.lookback_period, "daily");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("test.toml"),
            "[simulation]\ninvestment_per_trade = 250.0\ntransaction_cost_pct = 0.001\n\n\
             [strategy]\nlookback_period = \"weekly\"\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path(), "test").unwrap();
        assert_eq!(settings.simulation.investment_per_trade, 250.0);
        assert_eq!(settings.simulation.initial_capital, 10_000.0);

        let config = settings.simulation.to_config();
        assert_eq!(config.transaction_cost_pct, 0.001);
        assert!(config.validate().is_ok());

        let strategy = settings.strategy.to_config();
        assert_eq!(strategy.lookback_period.as_deref(), Some("weekly"));
        assert_eq!(strategy.price_change_threshold, Some(-0.05));
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("env.toml"),
            "[simulation]\ninvestment_per_trade = 250.0\n",
        )
        .unwrap();

        std::env::set_var("BACKTEST__SIMULATION__INVESTMENT_PER_TRADE", "321.5");
        std::env::set_var("BACKTEST__STRATEGY__LOOKBACK_PERIOD", "monthly");
        let loaded = Settings::load(dir.path(), "env");
        std::env::remove_var("BACKTEST__SIMULATION__INVESTMENT_PER_TRADE");
        std::env::remove_var("BACKTEST__STRATEGY__LOOKBACK_PERIOD");

        let settings = loaded.unwrap();
        assert_eq!(settings.simulation.investment_per_trade, 321.5);
        assert_eq!(settings.strategy.lookback_period, "monthly");
        assert_eq!(settings.simulation.initial_capital, 10_000.0);
    }
}
