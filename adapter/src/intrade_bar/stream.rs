//! The Intrade Bar price-tick WebSocket stream: connects, decodes
//! [`TickFrame`] JSON frames, and republishes them as [`PriceUpdateEvent`]s
//! on the shared event bus, generalized to a single owned background task
//! rather than an actor mailbox.

use super::wire::TickFrame;
use crate::connection::{ConnectionState, ConnectionTransition};
use core::EventBus;
use futures_util::StreamExt;
use model::{Event, PriceUpdateEvent, Tick, TickData, TickStatus};
use std::sync::{Arc, Mutex, Weak};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, warn};

const PRICE_DIGITS: u32 = 5;
const VOLUME_DIGITS: u32 = 2;
const PROVIDER: &str = "intrade_bar";

/// Run the price stream until `connection` is driven to
/// [`ConnectionState::Disconnected`] or the event bus is dropped. Reconnects
/// with the backoff recorded in [`ConnectionState::Reconnecting`] after
/// every lost connection.
pub async fn run(ws_url: String, event_bus: Weak<EventBus>, connection: Arc<Mutex<ConnectionState>>) {
    loop {
        if !set_state(&connection, ConnectionTransition::Connect) {
            return;
        }
        match connect_and_forward(&ws_url, &event_bus, &connection).await {
            Ok(()) => debug!("intrade_bar price stream closed cleanly"),
            Err(err) => warn!(%err, "intrade_bar price stream dropped"),
        }
        if event_bus.upgrade().is_none() {
            return;
        }
        if !set_state(&connection, ConnectionTransition::Lost) {
            return;
        }
        let delay = current_state(&connection).retry_delay();
        tokio::time::sleep(delay).await;
        if !set_state(&connection, ConnectionTransition::Retry) {
            return;
        }
    }
}

async fn connect_and_forward(
    ws_url: &str,
    event_bus: &Weak<EventBus>,
    connection: &Arc<Mutex<ConnectionState>>,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let (socket, _response) = tokio_tungstenite::connect_async(ws_url).await?;
    if !set_state(connection, ConnectionTransition::Established) {
        return Ok(());
    }
    let (_write, mut read) = socket.split();
    while let Some(message) = read.next().await {
        let Some(bus) = event_bus.upgrade() else {
            return Ok(());
        };
        match message? {
            Message::Text(text) => forward_frame(&bus, &text),
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

fn forward_frame(event_bus: &Arc<EventBus>, text: &str) {
    let frame: TickFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            error!(%err, "failed to parse intrade_bar tick frame");
            return;
        }
    };
    let tick = TickData {
        symbol: frame.symbol,
        price_digits: PRICE_DIGITS,
        volume_digits: VOLUME_DIGITS,
        provider: PROVIDER.to_string(),
        tick: Tick {
            bid: frame.bid,
            ask: frame.ask,
            last_volume: frame.last_volume,
            exchange_ms: frame.exchange_ms,
            received_ms: frame.exchange_ms,
            update_flags: 0,
        },
        status: TickStatus {
            initialized: frame.initialized,
            realtime: true,
        },
    };
    event_bus.notify_async(Event::PriceUpdate(PriceUpdateEvent { ticks: vec![tick] }));
}

fn set_state(connection: &Arc<Mutex<ConnectionState>>, transition: ConnectionTransition) -> bool {
    let mut guard = match connection.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if matches!(*guard, ConnectionState::Disconnected) && transition != ConnectionTransition::Connect {
        return false;
    }
    match guard.clone().transition(transition) {
        Ok(next) => {
            *guard = next;
            true
        }
        Err(err) => {
            warn!(%err, "ignoring invalid connection transition");
            true
        }
    }
}

fn current_state(connection: &Arc<Mutex<ConnectionState>>) -> ConnectionState {
    match connection.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
