use super::base::{SignalGenerator, StrategyConfig};
use backtest_common::data::{PricePoint, Signal};
use tracing::warn;

pub const BUY_THE_DIP_ID: &str = "buy_the_dip";
pub const DEFAULT_PRICE_CHANGE_THRESHOLD: f64 = -0.05;

/// Distance, in trading days, between the two closes being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookbackPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl LookbackPeriod {
    /// Unknown tags fall back to `Daily`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "daily" => LookbackPeriod::Daily,
            "weekly" => LookbackPeriod::Weekly,
            "monthly" => LookbackPeriod::Monthly,
            other => {
                warn!("Unknown lookback period '{}', using daily", other);
                LookbackPeriod::Daily
            }
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            LookbackPeriod::Daily => 1,
            LookbackPeriod::Weekly => 5,
            LookbackPeriod::Monthly => 21,
        }
    }
}

/// Buys whenever the close has fallen by at least the threshold relative to
/// the close `lookback` trading days earlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyTheDip {
    threshold: f64,
    lookback: LookbackPeriod,
}

impl Default for BuyTheDip {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_CHANGE_THRESHOLD, LookbackPeriod::Daily)
    }
}

impl BuyTheDip {
    pub fn new(threshold: f64, lookback: LookbackPeriod) -> Self {
        Self {
            threshold,
            lookback,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            config
                .price_change_threshold
                .unwrap_or(DEFAULT_PRICE_CHANGE_THRESHOLD),
            config
                .lookback_period
                .as_deref()
                .map(LookbackPeriod::from_tag)
                .unwrap_or_default(),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn lookback(&self) -> LookbackPeriod {
        self.lookback
    }
}

impl SignalGenerator for BuyTheDip {
    fn id(&self) -> &'static str {
        BUY_THE_DIP_ID
    }

    fn name(&self) -> &'static str {
        "Buy the Dip"
    }

    fn description(&self) -> &'static str {
        "Buys when the price falls by a threshold over a daily, weekly or monthly lookback"
    }

    fn generate_signals(&self, prices: &[PricePoint]) -> Vec<Signal> {
        let offset = self.lookback.offset();
        prices
            .iter()
            .zip(prices.iter().skip(offset))
            .filter(|(past, _)| past.adjusted_close > 0.0)
            .filter_map(|(past, today)| {
                let change = (today.adjusted_close - past.adjusted_close) / past.adjusted_close;
                (change <= self.threshold).then(|| {
                    Signal::buy(today.date)
                        .with_price(today.adjusted_close)
                        .with_trigger(format!(
                            "Price change {:.2}% <= threshold {:.2}% (previous close {})",
                            change * 100.0,
                            self.threshold * 100.0,
                            past.adjusted_close
                        ))
                })
            })
            .collect()
    }
}
