//! The mutable trade result owned by the enclosing transaction.

use crate::enums::{AccountType, CurrencyType};
use crate::error::TradeErrorCode;
use crate::state::TradeState;
use rust_decimal::Decimal;

/// The mutable half of a transaction. Created empty at admission and
/// filled in by the engine (validation outcome, timestamps, balance/payout
/// snapshots) and by the adapter (open/close prices, broker ids, final
/// settlement).
#[derive(Debug, Clone, PartialEq)]
pub struct TradeResult {
    /// Broker-assigned option id, once the adapter has opened the trade.
    pub option_id: String,
    /// Broker-assigned option hash, if the broker provides one.
    pub option_hash: String,
    /// Stake amount actually placed (normally equal to the request amount).
    pub amount: Decimal,
    /// Payout rate the adapter/provider offered at open time.
    pub payout_rate: Decimal,
    /// Realized profit once settled; zero until then.
    pub profit: Decimal,
    /// Account balance snapshotted at admission, or updated post-settlement.
    pub balance: Decimal,
    /// Price at which the trade opened.
    pub open_price: Decimal,
    /// Latest observed or final close price.
    pub close_price: Decimal,
    /// When the request was placed into the pending queue, ms since epoch.
    pub place_date: i64,
    /// When the request was admitted and sent to the adapter, ms since epoch.
    pub send_date: i64,
    /// When the adapter confirmed the order was opened, ms since epoch.
    pub open_date: i64,
    /// When the trade closed (settled or was computed to close), ms since epoch.
    pub close_date: i64,
    /// Adapter-reported processing delay, milliseconds.
    pub delay_ms: i64,
    /// Adapter-reported round-trip ping, milliseconds.
    pub ping_ms: i64,
    /// The authoritative lifecycle state.
    pub trade_state: TradeState,
    /// The provisional, price-driven state.
    pub live_state: TradeState,
    /// The first responsible error code, if any.
    pub error_code: TradeErrorCode,
    /// Human-readable description of `error_code`.
    pub error_description: String,
    /// Account type this result was recorded against.
    pub account_type: AccountType,
    /// Currency this result was recorded against.
    pub currency: CurrencyType,
    /// Adapter/platform identifier that produced this result.
    pub platform_type: String,
}

impl Default for TradeResult {
    fn default() -> Self {
        Self {
            option_id: String::new(),
            option_hash: String::new(),
            amount: Decimal::ZERO,
            payout_rate: Decimal::ZERO,
            profit: Decimal::ZERO,
            balance: Decimal::ZERO,
            open_price: Decimal::ZERO,
            close_price: Decimal::ZERO,
            place_date: 0,
            send_date: 0,
            open_date: 0,
            close_date: 0,
            delay_ms: 0,
            ping_ms: 0,
            trade_state: TradeState::Unknown,
            live_state: TradeState::Unknown,
            error_code: TradeErrorCode::Success,
            error_description: String::new(),
            account_type: AccountType::Unknown,
            currency: CurrencyType::Unknown,
            platform_type: String::new(),
        }
    }
}

impl TradeResult {
    /// Record `code` as the first responsible error: sets the error code
    /// and its canonical description (unless `description` is supplied).
    pub fn set_error(&mut self, code: TradeErrorCode, description: Option<&str>) {
        self.error_code = code;
        self.error_description = description
            .map(ToString::to_string)
            .unwrap_or_else(|| code.canonical_description().to_string());
    }
}
