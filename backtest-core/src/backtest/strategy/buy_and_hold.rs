use super::base::SignalGenerator;
use backtest_common::data::{PricePoint, Signal};

pub const BUY_AND_HOLD_ID: &str = "buy_and_hold";

/// One purchase on the first available day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuyAndHold;

impl SignalGenerator for BuyAndHold {
    fn id(&self) -> &'static str {
        BUY_AND_HOLD_ID
    }

    fn name(&self) -> &'static str {
        "Buy and Hold"
    }

    fn description(&self) -> &'static str {
        "Buys once on the first trading day and holds until the end"
    }

    fn generate_signals(&self, prices: &[PricePoint]) -> Vec<Signal> {
        prices
            .first()
            .map(|first| {
                Signal::buy(first.date)
                    .with_price(first.adjusted_close)
                    .with_trigger("Initial buy for buy-and-hold strategy")
            })
            .into_iter()
            .collect()
    }
}
