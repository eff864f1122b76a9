//! The Account Capability Provider: a typed, read-only oracle over an
//! opaque platform-specific account state. The core never reads
//! platform-specific fields directly — every predicate the validator or
//! the engine needs is expressed as a [`RequestKind`] query.

use model::{AccountInfoSnapshot, AccountType, CurrencyType, RequestContext, RequestKind};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// A typed, time-parameterized oracle over account limits, symbol/option
/// availability, payout, and connection status.
///
/// Queries never fail: an implementation that does not support a given
/// [`RequestKind`] returns the type's zero value (`false`, `0`, `""`,
/// `UNKNOWN`) rather than an error, and the validator treats a zero
/// boolean predicate as "not permitted".
/// Implementations must be safe for concurrent readers while an adapter
/// mutates the backing state behind its own lock.
pub trait AccountCapabilityProvider: Send + Sync {
    /// Answer a boolean-typed query.
    fn query_bool(&self, ctx: &RequestContext<'_>) -> bool;
    /// Answer an integer-typed query.
    fn query_i64(&self, ctx: &RequestContext<'_>) -> i64;
    /// Answer a decimal-typed query (balance, payout, rate accessors).
    fn query_f64(&self, ctx: &RequestContext<'_>) -> Decimal;
    /// Answer a string-typed query.
    fn query_str(&self, ctx: &RequestContext<'_>) -> String;
    /// Answer the account-type-typed query.
    fn query_account_type(&self, ctx: &RequestContext<'_>) -> AccountType;
    /// Answer the currency-typed query.
    fn query_currency(&self, ctx: &RequestContext<'_>) -> CurrencyType;
    /// A consolidated read of everything the engine's admission and
    /// close-evaluate phases need, gathered under one call.
    fn snapshot(&self, account_type: AccountType, now_ms: i64) -> AccountInfoSnapshot;
}

/// A reference, in-memory [`AccountCapabilityProvider`] backed by a single
/// [`AccountInfoSnapshot`] plus small symbol/option/order availability
/// tables. Used by the `optionx` binary's default configuration and by the
/// engine's own tests in place of a full HTTP-backed provider.
pub struct InMemoryCapabilityProvider {
    state: RwLock<ProviderState>,
}

struct ProviderState {
    snapshot: AccountInfoSnapshot,
    available_symbols: HashSet<String>,
    available_option_types: HashSet<model::OptionType>,
    available_order_types: HashSet<model::OrderDirection>,
    available_account_types: HashSet<AccountType>,
    available_currencies: HashSet<CurrencyType>,
}

impl InMemoryCapabilityProvider {
    /// Build a provider from an initial snapshot and the set of symbols it
    /// accepts; every option type, order direction, the snapshot's own
    /// account type and currency are marked available by default.
    #[must_use]
    pub fn new(snapshot: AccountInfoSnapshot, symbols: impl IntoIterator<Item = String>) -> Self {
        let account_type = snapshot.account_type;
        let currency = snapshot.currency;
        Self {
            state: RwLock::new(ProviderState {
                snapshot,
                available_symbols: symbols.into_iter().collect(),
                available_option_types: [model::OptionType::Sprint, model::OptionType::Classic]
                    .into_iter()
                    .collect(),
                available_order_types: [model::OrderDirection::Buy, model::OrderDirection::Sell]
                    .into_iter()
                    .collect(),
                available_account_types: [account_type].into_iter().collect(),
                available_currencies: [currency].into_iter().collect(),
            }),
        }
    }

    /// Replace the held snapshot wholesale, e.g. after the adapter
    /// publishes an `AccountInfoUpdateEvent`.
    pub fn update_snapshot(&self, snapshot: AccountInfoSnapshot) {
        let mut state = self.write();
        state.snapshot = snapshot;
    }

    /// Flip the connection flag, e.g. around a `ConnectRequestEvent` /
    /// `DisconnectRequestEvent` pair.
    pub fn set_connected(&self, connected: bool) {
        self.write().snapshot.connected = connected;
    }

    /// Adjust the open-trades counter the snapshot reports. The engine is
    /// the source of truth for this value; a provider backed by a real
    /// broker would instead refresh it from the wire.
    pub fn set_open_trades(&self, open_trades: i64) {
        self.write().snapshot.open_trades = open_trades;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ProviderState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ProviderState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AccountCapabilityProvider for InMemoryCapabilityProvider {
    fn query_bool(&self, ctx: &RequestContext<'_>) -> bool {
        let state = self.read();
        match ctx.kind {
            RequestKind::Connected => state.snapshot.connected,
            RequestKind::SymbolAvailable => state.available_symbols.contains(ctx.symbol),
            RequestKind::OptionTypeAvailable => ctx
                .option_type
                .is_some_and(|t| state.available_option_types.contains(&t)),
            RequestKind::OrderTypeAvailable => ctx
                .order_type
                .is_some_and(|t| state.available_order_types.contains(&t)),
            RequestKind::AccountTypeAvailable => ctx
                .account_type
                .is_some_and(|t| state.available_account_types.contains(&t)),
            RequestKind::CurrencyAvailable => ctx
                .currency
                .is_some_and(|c| state.available_currencies.contains(&c)),
            RequestKind::DurationAllowed => ctx.duration_secs.is_some_and(|d| {
                d >= state.snapshot.min_duration_secs && d <= state.snapshot.max_duration_secs
            }),
            RequestKind::ExpiryAllowed => ctx.expiry_time_secs.is_some_and(|expiry| {
                let expiry_ms = expiry.saturating_mul(1000);
                expiry_ms >= state.snapshot.session_start_ms
                    && expiry_ms <= state.snapshot.session_end_ms
            }),
            _ => false,
        }
    }

    fn query_i64(&self, ctx: &RequestContext<'_>) -> i64 {
        let state = self.read();
        match ctx.kind {
            RequestKind::OpenTrades => state.snapshot.open_trades,
            RequestKind::MaxTrades => state.snapshot.max_trades,
            RequestKind::MinDurationSecs => i64_from_u64(state.snapshot.min_duration_secs),
            RequestKind::MaxDurationSecs => i64_from_u64(state.snapshot.max_duration_secs),
            RequestKind::SessionStartMs => state.snapshot.session_start_ms,
            RequestKind::SessionEndMs => state.snapshot.session_end_ms,
            RequestKind::QueueTimeoutMs => state.snapshot.queue_timeout_ms,
            RequestKind::ResponseTimeoutMs => state.snapshot.response_timeout_ms,
            RequestKind::OrderIntervalMs => state.snapshot.order_interval_ms,
            RequestKind::PayoutBasisPoints => {
                let rate = state.snapshot.payout_rate(ctx.symbol);
                basis_points(rate)
            }
            _ => 0,
        }
    }

    fn query_f64(&self, ctx: &RequestContext<'_>) -> Decimal {
        let state = self.read();
        match ctx.kind {
            RequestKind::Balance => state.snapshot.balance,
            RequestKind::MinAmount => state.snapshot.min_amount,
            RequestKind::MaxAmount => state.snapshot.max_amount,
            RequestKind::MinRefund => state.snapshot.min_refund,
            RequestKind::MaxRefund => state.snapshot.max_refund,
            RequestKind::PayoutRate => state.snapshot.payout_rate(ctx.symbol),
            _ => Decimal::ZERO,
        }
    }

    fn query_str(&self, _ctx: &RequestContext<'_>) -> String {
        String::new()
    }

    fn query_account_type(&self, _ctx: &RequestContext<'_>) -> AccountType {
        self.read().snapshot.account_type
    }

    fn query_currency(&self, _ctx: &RequestContext<'_>) -> CurrencyType {
        self.read().snapshot.currency
    }

    fn snapshot(&self, _account_type: AccountType, _now_ms: i64) -> AccountInfoSnapshot {
        self.read().snapshot.clone()
    }
}

fn i64_from_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn basis_points(rate: Decimal) -> i64 {
    let bps = rate.saturating_mul(Decimal::from(10_000));
    bps.trunc()
        .to_string()
        .parse::<i64>()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::OptionType;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn snapshot() -> AccountInfoSnapshot {
        AccountInfoSnapshot {
            balance: dec!(1000),
            currency: CurrencyType::Usd,
            account_type: AccountType::Demo,
            connected: true,
            open_trades: 0,
            max_trades: 5,
            min_amount: dec!(1),
            max_amount: dec!(500),
            min_refund: dec!(0),
            max_refund: dec!(1),
            min_duration_secs: 5,
            max_duration_secs: 3600,
            session_start_ms: 0,
            session_end_ms: i64::MAX,
            queue_timeout_ms: 5_000,
            response_timeout_ms: 5_000,
            order_interval_ms: 1_000,
            payout_by_symbol: HashMap::from([("EURUSD".to_string(), dec!(0.8))]),
            default_payout_rate: dec!(0.7),
        }
    }

    #[test]
    fn unsupported_symbol_is_not_available() {
        let provider = InMemoryCapabilityProvider::new(snapshot(), vec!["EURUSD".to_string()]);
        let ctx = RequestContext {
            symbol: "GBPUSD",
            ..RequestContext::bare(RequestKind::SymbolAvailable, 0)
        };
        assert!(!provider.query_bool(&ctx));
    }

    #[test]
    fn payout_rate_falls_back_to_default_for_unlisted_symbol() {
        let provider = InMemoryCapabilityProvider::new(snapshot(), vec!["EURUSD".to_string()]);
        let known = RequestContext {
            symbol: "EURUSD",
            ..RequestContext::bare(RequestKind::PayoutRate, 0)
        };
        let unknown = RequestContext {
            symbol: "USDJPY",
            ..RequestContext::bare(RequestKind::PayoutRate, 0)
        };
        assert_eq!(provider.query_f64(&known), dec!(0.8));
        assert_eq!(provider.query_f64(&unknown), dec!(0.7));
    }

    #[test]
    fn option_type_availability_defaults_to_both_kinds() {
        let provider = InMemoryCapabilityProvider::new(snapshot(), vec!["EURUSD".to_string()]);
        let ctx = RequestContext {
            option_type: Some(OptionType::Classic),
            ..RequestContext::bare(RequestKind::OptionTypeAvailable, 0)
        };
        assert!(provider.query_bool(&ctx));
    }
}
