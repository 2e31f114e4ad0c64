// backtest/errors.rs

use backtest_common::data::DataError;
use thiserror::Error;

/// Backtest layer error types
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unknown strategy type: '{strategy}' (supported: {})", supported.join(", "))]
    StrategyNotFound {
        strategy: String,
        supported: Vec<String>,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataError),
}

impl BacktestError {
    /// Stable machine readable code for callers that translate errors into
    /// their own transport.
    pub fn code(&self) -> &'static str {
        match self {
            BacktestError::InsufficientData(_) => "INSUFFICIENT_DATA",
            BacktestError::StrategyNotFound { .. } => "STRATEGY_NOT_FOUND",
            BacktestError::InvalidRequest(_) => "INVALID_REQUEST",
            BacktestError::DataSource(_) => "DATA_SOURCE_ERROR",
        }
    }
}
