//! The trade error taxonomy.
//!
//! `TradeErrorCode` is a data field of [`crate::TradeResult`], not a Rust
//! `std::error::Error` — errors here are outcomes recorded on a value, per
//! the engine's "errors are values, not control-flow exits" design.

use std::fmt;

/// Every outcome the validator, the engine, or the adapter can record on a
/// [`crate::TradeResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeErrorCode {
    /// No error; the transaction progressed or settled normally.
    #[default]
    Success,
    /// The request's symbol was empty or not recognized by the account.
    InvalidSymbol,
    /// The request's option type is not available for this account/symbol.
    InvalidOption,
    /// The request's order direction is not available.
    InvalidOrder,
    /// The request's account type is not available.
    InvalidAccount,
    /// The request's currency is not available.
    InvalidCurrency,
    /// The request amount is below the account's minimum.
    AmountTooLow,
    /// The request amount is above the account's maximum.
    AmountTooHigh,
    /// The request's minimum refund rate is below the account's minimum.
    RefundTooLow,
    /// The request's minimum refund rate is above the account's maximum.
    RefundTooHigh,
    /// The payout offered is below the request's minimum acceptable payout.
    PayoutTooLow,
    /// The request's SPRINT duration is not allowed.
    InvalidDuration,
    /// The request's CLASSIC expiry time is not allowed.
    InvalidExpiryTime,
    /// The account's open-trades count is already at its limit.
    LimitOpenTrades,
    /// The request itself was malformed independent of account capability.
    InvalidRequest,
    /// The request waited in the pending queue longer than `queue_timeout`.
    LongQueueWait,
    /// The adapter did not settle the trade within `response_timeout`.
    LongResponseWait,
    /// The account capability provider reports no active connection.
    NoConnection,
    /// The transaction was finalized by a forced disconnect.
    ClientForcedClose,
    /// The adapter could not parse a broker response.
    ParsingError,
    /// The trade was canceled by the broker or the caller.
    CanceledTrade,
    /// The account balance is insufficient to fund the request.
    InsufficientBalance,
}

impl TradeErrorCode {
    /// The canonical human-readable description for this error code, used
    /// to fill `TradeResult::error_description` when no adapter-supplied
    /// diagnostic is available.
    #[must_use]
    pub fn canonical_description(self) -> &'static str {
        match self {
            TradeErrorCode::Success => "success",
            TradeErrorCode::InvalidSymbol => "symbol is empty or not available",
            TradeErrorCode::InvalidOption => "option type not available",
            TradeErrorCode::InvalidOrder => "order direction not available",
            TradeErrorCode::InvalidAccount => "account type not available",
            TradeErrorCode::InvalidCurrency => "currency not available",
            TradeErrorCode::AmountTooLow => "amount below account minimum",
            TradeErrorCode::AmountTooHigh => "amount above account maximum",
            TradeErrorCode::RefundTooLow => "refund rate below account minimum",
            TradeErrorCode::RefundTooHigh => "refund rate above account maximum",
            TradeErrorCode::PayoutTooLow => "payout below requested minimum",
            TradeErrorCode::InvalidDuration => "duration not allowed",
            TradeErrorCode::InvalidExpiryTime => "expiry time not allowed",
            TradeErrorCode::LimitOpenTrades => "open trades limit reached",
            TradeErrorCode::InvalidRequest => "request failed a basic validity check",
            TradeErrorCode::LongQueueWait => "request exceeded queue timeout while pending",
            TradeErrorCode::LongResponseWait => "adapter did not settle within response timeout",
            TradeErrorCode::NoConnection => "account capability provider reports no connection",
            TradeErrorCode::ClientForcedClose => "transaction force-closed by disconnect",
            TradeErrorCode::ParsingError => "adapter failed to parse a broker response",
            TradeErrorCode::CanceledTrade => "trade canceled",
            TradeErrorCode::InsufficientBalance => "balance insufficient to fund the request",
        }
    }

    /// True for any outcome other than [`TradeErrorCode::Success`].
    #[must_use]
    pub fn is_error(self) -> bool {
        !matches!(self, TradeErrorCode::Success)
    }
}

impl fmt::Display for TradeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_description())
    }
}
