//! The reference "Intrade Bar" adapter: a `reqwest` HTTP client for
//! open/settle requests plus a `tokio-tungstenite` price-tick stream,
//! wired to the event bus so the engine never talks to either directly.

mod client;
mod stream;
mod wire;

use crate::connection::ConnectionState;
use crate::session::SessionStore;
use client::HttpClient;
use model::{
    DisconnectRequestEvent, Event, OrderDirection, TradeErrorCode, TradeRequestEvent,
    TradeState, TradeStatusEvent, TradeTransaction,
};
use core::{EventBus, Module};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tracing::{error, info};
use wire::{OpenOrderRequest, SettlementStatus};

/// Configuration the reference adapter needs to reach the Intrade Bar
/// backend and authenticate against it.
#[derive(Debug, Clone)]
pub struct IntradeBarConfig {
    /// Base URL of the REST API, no trailing slash, e.g. `https://api.example.com`.
    pub base_url: String,
    /// WebSocket URL of the price-tick stream.
    pub ws_url: String,
    /// The account this adapter instance authenticates as.
    pub account_id: String,
}

/// The reference [`crate::BrokerAdapter`] implementation. Owns an HTTP
/// client for open/settle calls and drives a background price-tick
/// WebSocket task; both publish back onto the shared [`EventBus`] instead
/// of returning values synchronously, since neither the engine's tick nor
/// the scheduler's worker may block on network I/O.
#[derive(Debug)]
pub struct IntradeBarAdapter {
    client: HttpClient,
    ws_url: String,
    event_bus: Arc<EventBus>,
    runtime: Handle,
    connection: Arc<Mutex<ConnectionState>>,
}

impl IntradeBarAdapter {
    /// Build the adapter and subscribe it to `TradeRequestEvent`,
    /// `TradeStatusEvent` and `DisconnectRequestEvent` on `event_bus`. The
    /// caller must keep the returned `Arc` alive for as long as the
    /// subscriptions should remain active, and must call it from within a
    /// `tokio` runtime (the background price stream is spawned on
    /// `runtime`).
    #[must_use]
    pub fn new(
        config: IntradeBarConfig,
        event_bus: Arc<EventBus>,
        session_store: Arc<dyn SessionStore>,
        runtime: Handle,
    ) -> Arc<Self> {
        let client = HttpClient::new(config.base_url, config.account_id, session_store);
        let adapter = Arc::new(Self {
            client,
            ws_url: config.ws_url,
            event_bus: Arc::clone(&event_bus),
            runtime,
            connection: Arc::new(Mutex::new(ConnectionState::Disconnected)),
        });

        let open = Arc::clone(&adapter);
        event_bus.subscribe(model::EventKind::TradeRequest, move |event| {
            if let Event::TradeRequest(TradeRequestEvent { transaction }) = event {
                open.spawn_open(Arc::clone(transaction));
            }
        });

        let settle = Arc::clone(&adapter);
        event_bus.subscribe(model::EventKind::TradeStatus, move |event| {
            if let Event::TradeStatus(TradeStatusEvent { transaction }) = event {
                settle.spawn_settle(Arc::clone(transaction));
            }
        });

        let disconnect = Arc::clone(&adapter);
        event_bus.subscribe(model::EventKind::DisconnectRequest, move |event| {
            if let Event::DisconnectRequest(DisconnectRequestEvent { .. }) = event {
                disconnect.disconnect();
            }
        });

        adapter
    }

    fn spawn_open(&self, transaction: Arc<TradeTransaction>) {
        let client = self.client.clone();
        let event_bus = Arc::clone(&self.event_bus);
        self.runtime.spawn(async move {
            let request = transaction.request();
            let direction = match request.direction {
                OrderDirection::Buy => "BUY",
                OrderDirection::Sell => "SELL",
            };
            let wire_request = OpenOrderRequest {
                symbol: &request.symbol,
                direction,
                amount: request.amount,
                duration_secs: request.duration_secs,
                expiry_time_secs: request.expiry_time_secs,
            };
            match client.open_order(wire_request).await {
                Ok(response) => {
                    transaction.with_result_mut(|result| {
                        result.option_id = response.option_id;
                        result.option_hash = response.option_hash;
                        result.open_price = response.open_price;
                        result.payout_rate = response.payout_rate;
                        result.balance = response.balance;
                        result.trade_state = TradeState::OpenSuccess;
                        result.live_state = TradeState::OpenSuccess;
                    });
                }
                Err(err) => {
                    error!(%err, "intrade_bar open_trade failed");
                    transaction.with_result_mut(|result| {
                        result.set_error(TradeErrorCode::ParsingError, Some(&err.to_string()));
                        result.trade_state = TradeState::OpenError;
                        result.live_state = TradeState::OpenError;
                    });
                }
            }
            // Announce this mutation to the request's own callbacks before
            // handing the transaction back to the engine: OPEN_SUCCESS and
            // OPEN_ERROR are state changes the adapter itself causes, so the
            // engine's own tick is not the one that notifies callers of them.
            transaction.notify();
            event_bus.notify_async(Event::TradeStatus(TradeStatusEvent { transaction }));
        });
    }

    fn spawn_settle(&self, transaction: Arc<TradeTransaction>) {
        let option_id = transaction.result().option_id;
        if option_id.is_empty() {
            return;
        }
        let client = self.client.clone();
        let event_bus = Arc::clone(&self.event_bus);
        self.runtime.spawn(async move {
            match client.poll_settlement(&option_id).await {
                Ok(response) if response.status == SettlementStatus::Pending => {}
                Ok(response) => {
                    transaction.with_result_mut(|result| {
                        result.close_price = response.close_price;
                        result.profit = response.profit;
                        result.balance = response.balance;
                        result.trade_state = match response.status {
                            SettlementStatus::Win => TradeState::Win,
                            SettlementStatus::Loss => TradeState::Loss,
                            SettlementStatus::Standoff => TradeState::Standoff,
                            SettlementStatus::Refund => TradeState::Refund,
                            SettlementStatus::Pending => unreachable!("handled above"),
                        };
                        result.live_state = result.trade_state;
                    });
                    event_bus.notify_async(Event::TradeStatus(TradeStatusEvent { transaction }));
                }
                Err(err) => {
                    error!(%err, "intrade_bar settle_trade failed");
                    transaction.with_result_mut(|result| {
                        result.set_error(TradeErrorCode::ParsingError, Some(&err.to_string()));
                        result.trade_state = TradeState::CheckError;
                        result.live_state = TradeState::CheckError;
                    });
                    event_bus.notify_async(Event::TradeStatus(TradeStatusEvent { transaction }));
                }
            }
        });
    }

    fn disconnect(&self) {
        let mut guard = match self.connection.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = ConnectionState::Disconnected;
    }
}

impl crate::BrokerAdapter for IntradeBarAdapter {
    fn open_trade(&self, transaction: Arc<TradeTransaction>) {
        self.spawn_open(transaction);
    }

    fn settle_trade(&self, transaction: Arc<TradeTransaction>) {
        self.spawn_settle(transaction);
    }
}

impl Module for IntradeBarAdapter {
    fn on_start(&self) {
        info!(ws_url = %self.ws_url, "starting intrade_bar price stream");
        let ws_url = self.ws_url.clone();
        let event_bus = Arc::downgrade(&self.event_bus);
        let connection = Arc::clone(&self.connection);
        self.runtime.spawn(stream::run(ws_url, event_bus, connection));
    }

    fn on_shutdown(&self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticSessionStore;
    use httpmock::prelude::*;
    use model::{TradeRequest, TradeTransaction};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[tokio::test]
    async fn open_trade_records_a_success_and_publishes_trade_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/option/open");
            then.status(200).json_body(serde_json::json!({
                "option_id": "opt-9",
                "option_hash": "",
                "open_price": "1.5",
                "payout_rate": "0.8",
                "balance": "900",
            }));
        });

        let bus = Arc::new(EventBus::new());
        let store = Arc::new(StaticSessionStore::new("acct-1", "tok"));
        let config = IntradeBarConfig {
            base_url: server.base_url(),
            ws_url: "ws://127.0.0.1:0".to_string(),
            account_id: "acct-1".to_string(),
        };
        let adapter = IntradeBarAdapter::new(config, Arc::clone(&bus), store, Handle::current());

        let notified = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let notified_clone = Arc::clone(&notified);
        bus.subscribe(model::EventKind::TradeStatus, move |_event| {
            notified_clone.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        let transaction = Arc::new(TradeTransaction::new(
            TradeRequest {
                symbol: "EURUSD".to_string(),
                amount: dec!(100),
                ..Default::default()
            },
            0,
        ));
        adapter.spawn_open(Arc::clone(&transaction));

        tokio::time::sleep(Duration::from_millis(50)).await;
        bus.process();

        assert_eq!(transaction.result().option_id, "opt-9");
        assert_eq!(transaction.result().trade_state, TradeState::OpenSuccess);
        assert!(notified.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn settle_trade_ignores_a_pending_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/option/opt-1");
            then.status(200).json_body(serde_json::json!({
                "status": "pending",
                "close_price": "0",
                "profit": "0",
                "balance": "900",
            }));
        });

        let bus = Arc::new(EventBus::new());
        let store = Arc::new(StaticSessionStore::new("acct-1", "tok"));
        let config = IntradeBarConfig {
            base_url: server.base_url(),
            ws_url: "ws://127.0.0.1:0".to_string(),
            account_id: "acct-1".to_string(),
        };
        let adapter = IntradeBarAdapter::new(config, Arc::clone(&bus), store, Handle::current());

        let transaction = Arc::new(TradeTransaction::new(TradeRequest::default(), 0));
        transaction.with_result_mut(|result| result.option_id = "opt-1".to_string());
        adapter.spawn_settle(Arc::clone(&transaction));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transaction.result().trade_state, TradeState::Unknown);
    }
}
