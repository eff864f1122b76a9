//! OptionX Adapter Crate - Broker Conversation Layer
//!
//! This crate contains the authenticated HTTP/WebSocket conversation with
//! a binary-options broker backend (the reference backend is "Intrade
//! Bar"), the connection-lifecycle state machine that couples that
//! conversation to the event bus, and the `BrokerAdapter` trait the
//! `optionx` binary composes against. The core never imports this crate's
//! concrete types directly — it only sees the events this crate publishes
//! and consumes.

// === FINANCIAL APPLICATION SAFETY LINTS ===
// These lint rules are critical for financial applications where precision,
// safety, and reliability are paramount. Violations can lead to financial losses.

#![deny(
    // Error handling safety - force proper error handling
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,

    // Financial precision safety - prevent calculation errors
    clippy::float_arithmetic,
    clippy::arithmetic_side_effects,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,

    // Code quality enforcement
    clippy::cognitive_complexity,
    clippy::too_many_lines,
)]
// Allow unwrap and expect in test code only
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// Standard Rust lints for code quality
#![warn(missing_docs, rust_2018_idioms, missing_debug_implementations)]

use model::TradeTransaction;
use std::sync::Arc;

/// The connection-lifecycle state machine coupling the broker conversation
/// to the event bus.
pub mod connection;
/// Structural adapter errors.
pub mod error;
/// The reference "Intrade Bar" adapter.
pub mod intrade_bar;
/// The injected session-store seam.
pub mod session;

pub use connection::{ConnectionState, ConnectionTransition};
pub use error::AdapterError;
pub use intrade_bar::{IntradeBarAdapter, IntradeBarConfig};
pub use session::{SessionStore, SessionToken, StaticSessionStore};

/// The contract any broker backend's conversation layer must honor toward
/// the engine. Both methods are non-blocking entry points: an
/// implementation queues the actual HTTP/WebSocket work onto its own
/// runtime and returns immediately, since engine phases never block on
/// I/O. The engine calls neither of these directly; the `optionx`
/// binary's composition root wires them to the event-bus subscriptions
/// that trigger them.
pub trait BrokerAdapter: Send + Sync {
    /// Execute a newly admitted trade and, once the broker confirms it,
    /// mutate `transaction`'s result with `option_id`/`open_date`/
    /// `open_price`/`trade_state` and publish a follow-on event.
    fn open_trade(&self, transaction: Arc<TradeTransaction>);

    /// Settle a transaction that has entered `WAITING_CLOSE` and mutate
    /// `transaction`'s result with `close_price`/`profit`/`balance`/
    /// `trade_state`.
    fn settle_trade(&self, transaction: Arc<TradeTransaction>);
}
