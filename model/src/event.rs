//! The tagged-sum event type coupling the engine, the scheduler, and the
//! adapter. Handlers match on a closed `Event` enum rather than
//! downcasting a shared base type at runtime.

use crate::enums::AccountType;
use crate::tick::TickData;
use crate::transaction::TradeTransaction;
use std::sync::Arc;

/// Published by the engine on admission. The adapter must execute the
/// order and mutate `transaction`'s result with
/// `option_id`/`open_date`/`open_price`/`trade_state`, then publish a
/// follow-on event so the engine observes the change.
#[derive(Debug, Clone)]
pub struct TradeRequestEvent {
    /// The transaction the adapter must open.
    pub transaction: Arc<TradeTransaction>,
}

/// Published by the engine when a transaction enters `WAITING_CLOSE`. The
/// adapter must settle and mutate `transaction`'s result with
/// `close_price`/`profit`/`balance`/`trade_state`.
#[derive(Debug, Clone)]
pub struct TradeStatusEvent {
    /// The transaction the adapter must settle.
    pub transaction: Arc<TradeTransaction>,
}

/// Published by the engine on every increment/decrement of the open-trades
/// counter.
#[derive(Debug, Clone)]
pub struct OpenTradesEvent {
    /// The open-trades counter's value after this change.
    pub count: i64,
    /// The transaction whose admission or finalization caused the change.
    pub transaction: Arc<TradeTransaction>,
}

/// Published by the adapter or a market-data source; a vector of price
/// samples the engine folds into live-state recomputation.
#[derive(Debug, Clone)]
pub struct PriceUpdateEvent {
    /// The price samples carried by this publish.
    pub ticks: Vec<TickData>,
}

/// Published by the caller or the adapter to request that every tracked
/// transaction be finalized immediately, e.g. on a lost connection.
#[derive(Debug, Clone)]
pub struct DisconnectRequestEvent {
    /// Optional completion callback, invoked once the finalize-all sweep
    /// has drained both queues.
    pub callback: Option<Arc<dyn Fn() + Send + Sync>>,
}

/// Forwarded to the engine so it knows to re-consult the capability
/// provider; the engine does not own authentication state itself.
#[derive(Debug, Clone)]
pub struct AuthDataEvent {
    /// The account this authentication event concerns.
    pub account_id: String,
}

/// Forwarded to the engine; signals that the adapter has (re)established a
/// connection and capability queries should be considered fresh.
#[derive(Debug, Clone)]
pub struct ConnectRequestEvent {
    /// The account this connection event concerns.
    pub account_id: String,
}

/// Forwarded to the engine whenever the capability provider's backing
/// account data changes account type (e.g. demo/real switch).
#[derive(Debug, Clone)]
pub struct AccountInfoUpdateEvent {
    /// The account this update concerns.
    pub account_id: String,
    /// The account type now in effect.
    pub account_type: AccountType,
}

/// The tagged sum of every event the bus carries. One variant per payload
/// type; handlers match on this tag instead of performing runtime type
/// discrimination on a shared base class.
#[derive(Debug, Clone)]
pub enum Event {
    /// See [`TradeRequestEvent`].
    TradeRequest(TradeRequestEvent),
    /// See [`TradeStatusEvent`].
    TradeStatus(TradeStatusEvent),
    /// See [`OpenTradesEvent`].
    OpenTrades(OpenTradesEvent),
    /// See [`PriceUpdateEvent`].
    PriceUpdate(PriceUpdateEvent),
    /// See [`DisconnectRequestEvent`].
    DisconnectRequest(DisconnectRequestEvent),
    /// See [`AuthDataEvent`].
    AuthData(AuthDataEvent),
    /// See [`ConnectRequestEvent`].
    ConnectRequest(ConnectRequestEvent),
    /// See [`AccountInfoUpdateEvent`].
    AccountInfoUpdate(AccountInfoUpdateEvent),
}

impl Event {
    /// The [`EventKind`] tag for this event, used to key the subscription table.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::TradeRequest(_) => EventKind::TradeRequest,
            Event::TradeStatus(_) => EventKind::TradeStatus,
            Event::OpenTrades(_) => EventKind::OpenTrades,
            Event::PriceUpdate(_) => EventKind::PriceUpdate,
            Event::DisconnectRequest(_) => EventKind::DisconnectRequest,
            Event::AuthData(_) => EventKind::AuthData,
            Event::ConnectRequest(_) => EventKind::ConnectRequest,
            Event::AccountInfoUpdate(_) => EventKind::AccountInfoUpdate,
        }
    }
}

/// The tag used to key the event bus's subscription table. One variant per
/// [`Event`] variant, carrying no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`TradeRequestEvent`].
    TradeRequest,
    /// See [`TradeStatusEvent`].
    TradeStatus,
    /// See [`OpenTradesEvent`].
    OpenTrades,
    /// See [`PriceUpdateEvent`].
    PriceUpdate,
    /// See [`DisconnectRequestEvent`].
    DisconnectRequest,
    /// See [`AuthDataEvent`].
    AuthData,
    /// See [`ConnectRequestEvent`].
    ConnectRequest,
    /// See [`AccountInfoUpdateEvent`].
    AccountInfoUpdate,
}
