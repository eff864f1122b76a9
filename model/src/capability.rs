//! The typed, time-parameterized capability query surface consulted by the
//! validator and the engine. See [`crate::AccountInfoSnapshot`] for the
//! aggregate read used by the engine's admission phase.

use crate::enums::{AccountType, CurrencyType, OptionType, OrderDirection};
use rust_decimal::Decimal;

/// The concrete enumeration of queries the core ever issues against the
/// account capability provider. Every boolean predicate the validator
/// needs, and every numeric/session accessor the engine's admission and
/// close-evaluate phases need, has a dedicated variant; this enumeration
/// is normative, not extensible at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Is the account currently connected to the broker.
    Connected,
    /// Is `context.symbol` tradable.
    SymbolAvailable,
    /// Is `context.option_type` tradable.
    OptionTypeAvailable,
    /// Is `context.order_type` tradable.
    OrderTypeAvailable,
    /// Is `context.account_type` available on this connection.
    AccountTypeAvailable,
    /// Is `context.currency` available on this connection.
    CurrencyAvailable,
    /// Current account balance.
    Balance,
    /// Current open-trades count.
    OpenTrades,
    /// Maximum simultaneous open trades allowed.
    MaxTrades,
    /// Minimum stake amount allowed.
    MinAmount,
    /// Maximum stake amount allowed.
    MaxAmount,
    /// Minimum acceptable refund rate.
    MinRefund,
    /// Maximum acceptable refund rate.
    MaxRefund,
    /// Payout rate for `context.symbol`/`context.option_type`, as a rate in `[0,1]`.
    PayoutRate,
    /// Payout rate for `context.symbol`/`context.option_type`, in integer basis points.
    PayoutBasisPoints,
    /// Minimum SPRINT duration allowed, in seconds.
    MinDurationSecs,
    /// Maximum SPRINT duration allowed, in seconds.
    MaxDurationSecs,
    /// Is `context.duration_secs` an allowed SPRINT duration.
    DurationAllowed,
    /// Is `context.expiry_time_secs` an allowed CLASSIC expiry.
    ExpiryAllowed,
    /// Trading session start, milliseconds since epoch.
    SessionStartMs,
    /// Trading session end, milliseconds since epoch.
    SessionEndMs,
    /// Pending-queue dwell timeout, milliseconds.
    QueueTimeoutMs,
    /// Post-close-time adapter settlement wait, milliseconds.
    ResponseTimeoutMs,
    /// Minimum interval between two successful admissions, milliseconds.
    OrderIntervalMs,
}

/// The context accompanying every capability query: the asked-about
/// request fields plus the reference timestamp for time-parameterized
/// answers. A zero timestamp lets the implementation pick its own
/// reference time (typically "now").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext<'a> {
    /// Which query is being asked.
    pub kind: RequestKind,
    /// The symbol the query concerns, if any.
    pub symbol: &'a str,
    /// The option type the query concerns, if any.
    pub option_type: Option<OptionType>,
    /// The order direction the query concerns, if any.
    pub order_type: Option<OrderDirection>,
    /// The account type the query concerns, if any.
    pub account_type: Option<AccountType>,
    /// The currency the query concerns, if any.
    pub currency: Option<CurrencyType>,
    /// The stake amount the query concerns, if any.
    pub amount: Option<Decimal>,
    /// The SPRINT duration the query concerns, if any.
    pub duration_secs: Option<u64>,
    /// The CLASSIC expiry time the query concerns, if any.
    pub expiry_time_secs: Option<i64>,
    /// The caller's minimum acceptable payout, if any.
    pub min_payout: Option<Decimal>,
    /// Reference time, milliseconds since epoch; zero means "now".
    pub timestamp_ms: i64,
}

impl<'a> RequestContext<'a> {
    /// A context asking only `kind`, with no request fields populated —
    /// useful for session-level accessors like `QueueTimeoutMs`.
    #[must_use]
    pub fn bare(kind: RequestKind, timestamp_ms: i64) -> Self {
        Self {
            kind,
            symbol: "",
            option_type: None,
            order_type: None,
            account_type: None,
            currency: None,
            amount: None,
            duration_secs: None,
            expiry_time_secs: None,
            min_payout: None,
            timestamp_ms,
        }
    }
}
