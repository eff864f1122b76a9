//! The aggregate account capability read consumed by the engine's
//! admission and close-evaluate phases.

use crate::enums::{AccountType, CurrencyType};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A snapshot of everything the trade lifecycle engine needs from the
/// account capability provider to admit and settle trades, gathered in one
/// read so the engine's tick does not issue a query per field on every
/// pass. Individual fields still correspond one-to-one to a
/// [`crate::RequestKind`] variant, so a provider may build this either by
/// answering each query directly or by caching an upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfoSnapshot {
    /// Current account balance.
    pub balance: Decimal,
    /// Settlement currency.
    pub currency: CurrencyType,
    /// Demo or real account.
    pub account_type: AccountType,
    /// Whether the adapter currently reports a live connection.
    pub connected: bool,
    /// Current open-trades count.
    pub open_trades: i64,
    /// Maximum simultaneous open trades allowed.
    pub max_trades: i64,
    /// Minimum stake amount allowed.
    pub min_amount: Decimal,
    /// Maximum stake amount allowed.
    pub max_amount: Decimal,
    /// Minimum acceptable refund rate.
    pub min_refund: Decimal,
    /// Maximum acceptable refund rate.
    pub max_refund: Decimal,
    /// Minimum SPRINT duration allowed, in seconds.
    pub min_duration_secs: u64,
    /// Maximum SPRINT duration allowed, in seconds.
    pub max_duration_secs: u64,
    /// Trading session start, milliseconds since epoch.
    pub session_start_ms: i64,
    /// Trading session end, milliseconds since epoch.
    pub session_end_ms: i64,
    /// Pending-queue dwell timeout, milliseconds.
    pub queue_timeout_ms: i64,
    /// Post-close-time adapter settlement wait, milliseconds.
    pub response_timeout_ms: i64,
    /// Minimum interval between two successful admissions, milliseconds.
    pub order_interval_ms: i64,
    /// Per-symbol payout rate table, as a rate in `[0,1]`. A symbol absent
    /// from this table falls back to `default_payout_rate`.
    ///
    /// The source platform's two overlapping `AccountInfoData` payout
    /// tables are treated as an implementation detail of whichever
    /// provider builds this snapshot; the core only sees one opaque table.
    pub payout_by_symbol: HashMap<String, Decimal>,
    /// Payout rate used for symbols absent from `payout_by_symbol`.
    pub default_payout_rate: Decimal,
}

impl AccountInfoSnapshot {
    /// The payout rate for `symbol`, falling back to the default rate.
    #[must_use]
    pub fn payout_rate(&self, symbol: &str) -> Decimal {
        self.payout_by_symbol
            .get(symbol)
            .copied()
            .unwrap_or(self.default_payout_rate)
    }
}
