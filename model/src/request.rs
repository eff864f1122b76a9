//! The immutable trade request submitted by callers.

use crate::enums::{AccountType, CurrencyType, OptionType, OrderDirection};
use crate::result::TradeResult;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A result callback invoked by the engine on every state change it emits
/// for the owning transaction, and at least once in a terminal state.
/// Callbacks receive owned clones of the request and result; mutating the
/// arguments does not affect engine state.
pub type ResultCallback = Arc<dyn Fn(&TradeRequest, &TradeResult) + Send + Sync>;

/// A caller's trade instruction. Immutable once submitted: the engine
/// never mutates a `TradeRequest` after `place_trade` accepts it, only the
/// paired `TradeResult`.
#[derive(Clone)]
pub struct TradeRequest {
    /// Instrument symbol, e.g. "EURUSD". May be empty on submission; empty
    /// symbols always fail validation.
    pub symbol: String,
    /// SPRINT or CLASSIC.
    pub option_type: OptionType,
    /// BUY or SELL.
    pub direction: OrderDirection,
    /// Stake amount. Must be positive.
    pub amount: Decimal,
    /// Caller-offered refund rate, a fraction in `[0,1]`.
    pub refund_rate: Decimal,
    /// Minimum acceptable payout rate, a fraction in `[0,1]`.
    pub min_payout: Decimal,
    /// SPRINT-only: duration from admission to close, in seconds.
    pub duration_secs: Option<u64>,
    /// CLASSIC-only: wall-clock expiry, seconds since epoch.
    pub expiry_time_secs: Option<i64>,
    /// Target account type; `UNKNOWN` is resolved from the capability
    /// provider at admission time.
    pub account_type: AccountType,
    /// Settlement currency; `UNKNOWN` is resolved from the capability
    /// provider at admission time.
    pub currency: CurrencyType,
    /// Free-form signal/strategy name tag.
    pub signal_name: String,
    /// Free-form caller-supplied payload, opaque to the engine.
    pub user_data: String,
    /// Free-form human comment.
    pub comment: String,
    /// Caller-supplied idempotency hash.
    pub unique_hash: String,
    /// Caller-supplied idempotency id.
    pub unique_id: String,
    /// The account this request targets.
    pub account_id: String,
    /// Callbacks invoked by the engine on every state change.
    pub callbacks: Vec<ResultCallback>,
}

impl std::fmt::Debug for TradeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeRequest")
            .field("symbol", &self.symbol)
            .field("option_type", &self.option_type)
            .field("direction", &self.direction)
            .field("amount", &self.amount)
            .field("refund_rate", &self.refund_rate)
            .field("min_payout", &self.min_payout)
            .field("duration_secs", &self.duration_secs)
            .field("expiry_time_secs", &self.expiry_time_secs)
            .field("account_type", &self.account_type)
            .field("currency", &self.currency)
            .field("signal_name", &self.signal_name)
            .field("unique_id", &self.unique_id)
            .field("account_id", &self.account_id)
            .field("callbacks", &format!("<{} callback(s)>", self.callbacks.len()))
            .finish()
    }
}

impl Default for TradeRequest {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            option_type: OptionType::Sprint,
            direction: OrderDirection::Buy,
            amount: Decimal::ZERO,
            refund_rate: Decimal::ZERO,
            min_payout: Decimal::ZERO,
            duration_secs: None,
            expiry_time_secs: None,
            account_type: AccountType::Unknown,
            currency: CurrencyType::Unknown,
            signal_name: String::new(),
            user_data: String::new(),
            comment: String::new(),
            unique_hash: String::new(),
            unique_id: String::new(),
            account_id: String::new(),
            callbacks: Vec::new(),
        }
    }
}

impl TradeRequest {
    /// Invoke every registered callback with the current request/result
    /// pair, the way the engine does on each state change it emits.
    pub fn notify(&self, result: &TradeResult) {
        for callback in &self.callbacks {
            callback(self, result);
        }
    }
}
