// =================================================================
// data/source.rs - Market Data Sources
// =================================================================

use super::types::{DataError, DividendEvent, PricePoint};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplier of price and dividend history. Implementations are constructed by
/// the caller and handed to whatever needs them.
pub trait MarketDataSource {
    /// Prices for `ticker` with `start <= date <= end`, ascending by date.
    fn prices(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, DataError>;

    /// Dividends for `ticker` with `start <= ex_date <= end`, ascending by date.
    fn dividends(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DividendEvent>, DataError>;
}

fn check_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), DataError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(DataError::InvalidRange { start, end }),
        _ => Ok(()),
    }
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

/// Source backed by vectors already in memory. The ticker is ignored.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    prices: Vec<PricePoint>,
    dividends: Vec<DividendEvent>,
}

impl InMemorySource {
    pub fn new(prices: Vec<PricePoint>, dividends: Vec<DividendEvent>) -> Self {
        Self { prices, dividends }
    }
}

impl MarketDataSource for InMemorySource {
    fn prices(
        &self,
        _ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, DataError> {
        check_range(start, end)?;
        Ok(self
            .prices
            .iter()
            .filter(|p| in_range(p.date, start, end))
            .copied()
            .collect())
    }

    fn dividends(
        &self,
        _ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DividendEvent>, DataError> {
        check_range(start, end)?;
        Ok(self
            .dividends
            .iter()
            .filter(|d| in_range(d.ex_date, start, end))
            .copied()
            .collect())
    }
}

/// Source that reads JSON arrays of prices and (optionally) dividends from
/// disk on every call. The ticker is only used for logging.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    prices_path: PathBuf,
    dividends_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(prices_path: impl Into<PathBuf>) -> Self {
        Self {
            prices_path: prices_path.into(),
            dividends_path: None,
        }
    }

    pub fn with_dividends(mut self, dividends_path: impl Into<PathBuf>) -> Self {
        self.dividends_path = Some(dividends_path.into());
        self
    }
}

impl MarketDataSource for JsonFileSource {
    fn prices(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, DataError> {
        check_range(start, end)?;
        let mut prices: Vec<PricePoint> = read_json_file(&self.prices_path)?;
        prices.retain(|p| in_range(p.date, start, end));
        prices.sort_by_key(|p| p.date);
        debug!("Loaded {} price points for {}", prices.len(), ticker);
        Ok(prices)
    }

    fn dividends(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DividendEvent>, DataError> {
        check_range(start, end)?;
        let Some(path) = &self.dividends_path else {
            return Ok(Vec::new());
        };
        let mut dividends: Vec<DividendEvent> = read_json_file(path)?;
        dividends.retain(|d| in_range(d.ex_date, start, end));
        dividends.sort_by_key(|d| d.ex_date);
        debug!("Loaded {} dividend events for {}", dividends.len(), ticker);
        Ok(dividends)
    }
}

/// Read and deserialize a JSON document from `path`.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, DataError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}
