//! Streaming price tick types consumed by `PriceUpdateEvent`.

use rust_decimal::Decimal;

/// A single bid/ask sample plus its provider-side timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Size of the last trade, in lots.
    pub last_volume: Decimal,
    /// Exchange-side timestamp, milliseconds since epoch.
    pub exchange_ms: i64,
    /// Local receipt timestamp, milliseconds since epoch.
    pub received_ms: i64,
    /// Provider-defined bitmask of which fields in this tick were updated.
    pub update_flags: u32,
}

/// Status flags accompanying a [`TickData`] sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStatus {
    /// The provider has finished its initial snapshot for this symbol.
    pub initialized: bool,
    /// This sample arrived over the realtime stream (not a REST poll).
    pub realtime: bool,
}

/// One symbol's price update, as published on `PriceUpdateEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickData {
    /// Instrument symbol, e.g. "EURUSD".
    pub symbol: String,
    /// Number of decimal digits used when comparing prices for this symbol.
    pub price_digits: u32,
    /// Number of decimal digits used for volume figures.
    pub volume_digits: u32,
    /// Upstream data provider identifier.
    pub provider: String,
    /// The bid/ask/volume/timing sample itself.
    pub tick: Tick,
    /// Provider status flags.
    pub status: TickStatus,
}

impl TickData {
    /// True iff the provider is ready and this sample came over the
    /// realtime stream — the engine only acts on initialized ticks.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.status.initialized
    }

    /// The mid price `(bid + ask) / 2`, rounded to this symbol's declared
    /// price precision.
    #[must_use]
    pub fn mid_price(&self) -> Decimal {
        let sum = self.tick.bid.saturating_add(self.tick.ask);
        // `checked_div` only fails on a zero divisor, which `Decimal::from(2)` never is.
        let mid = sum.checked_div(Decimal::from(2)).unwrap_or(sum);
        mid.round_dp(self.price_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(bid: Decimal, ask: Decimal) -> TickData {
        TickData {
            symbol: "EURUSD".to_string(),
            price_digits: 5,
            volume_digits: 2,
            provider: "test".to_string(),
            tick: Tick {
                bid,
                ask,
                last_volume: dec!(0),
                exchange_ms: 0,
                received_ms: 0,
                update_flags: 0,
            },
            status: TickStatus {
                initialized: true,
                realtime: true,
            },
        }
    }

    #[test]
    fn mid_price_rounds_to_declared_precision() {
        let tick = sample(dec!(1.12340), dec!(1.12350));
        assert_eq!(tick.mid_price(), dec!(1.12345));
    }

    #[test]
    fn is_initialized_reflects_status_flag() {
        let mut tick = sample(dec!(1), dec!(1));
        assert!(tick.is_initialized());
        tick.status.initialized = false;
        assert!(!tick.is_initialized());
    }
}
