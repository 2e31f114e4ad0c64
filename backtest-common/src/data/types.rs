// =================================================================
// data/types.rs - Market Data Structures
// =================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily observation. `adjusted_close` is the only price used for
/// valuation and execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }
}

/// Dividend entitlement, paid against shares held on `ex_date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub ex_date: NaiveDate,
    pub amount_per_share: f64,
}

impl DividendEvent {
    pub fn new(ex_date: NaiveDate, amount_per_share: f64) -> Self {
        Self {
            ex_date,
            amount_per_share,
        }
    }
}

/// Trade direction requested by a signal.
///
/// Only buys exist in this model. Anything else a producer sends is kept as
/// `Unsupported` so the engine can ignore it instead of rejecting the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAction {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(other, rename = "UNSUPPORTED")]
    Unsupported,
}

impl SignalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Unsupported => "UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to trade on `date`. Several signals may share a date; they are
/// executed in the order supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub action: SignalAction,
    /// Price observed by the producer when it raised the signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Human readable reason the producer raised the signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl Signal {
    pub fn buy(date: NaiveDate) -> Self {
        Self {
            date,
            action: SignalAction::Buy,
            price: None,
            trigger: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

/// Error types for loading market data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
