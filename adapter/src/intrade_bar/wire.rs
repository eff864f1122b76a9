//! Wire shapes for the Intrade Bar HTTP and WebSocket APIs. These types
//! exist only to be deserialized from (or serialized to) JSON; the
//! `mod.rs` translation layer is the only place that converts them into
//! `model` types or mutates a `TradeTransaction`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of a `POST /option/open` request.
#[derive(Debug, Clone, Serialize)]
pub struct OpenOrderRequest<'a> {
    pub symbol: &'a str,
    pub direction: &'a str,
    pub amount: Decimal,
    pub duration_secs: Option<u64>,
    pub expiry_time_secs: Option<i64>,
}

/// Body of the `POST /option/open` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrderResponse {
    pub option_id: String,
    #[serde(default)]
    pub option_hash: String,
    pub open_price: Decimal,
    pub payout_rate: Decimal,
    pub balance: Decimal,
}

/// Body of a `GET /option/{option_id}` settlement poll response.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementResponse {
    pub status: SettlementStatus,
    pub close_price: Decimal,
    pub profit: Decimal,
    pub balance: Decimal,
}

/// The broker's own outcome tag, translated into a [`model::TradeState`] by
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// The option has not yet reached its close time.
    Pending,
    /// Settled a win.
    Win,
    /// Settled a loss.
    Loss,
    /// Settled flat.
    Standoff,
    /// Stake refunded.
    Refund,
}

/// One frame of the price-tick WebSocket stream.
#[derive(Debug, Clone, Deserialize)]
pub struct TickFrame {
    pub symbol: String,
    pub bid: Decimal,
    pub ask: Decimal,
    #[serde(default)]
    pub last_volume: Decimal,
    pub exchange_ms: i64,
    #[serde(default)]
    pub initialized: bool,
}
