//! OptionX Model Crate - Core Data Types
//!
//! This crate contains the data model shared by the trade lifecycle
//! engine, the account capability provider, and the broker adapter: trade
//! requests and results, the trade state machine, price ticks, account
//! capability snapshots, and the typed event bus payloads that couple
//! them together.

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

/// Account capability snapshot returned by capability provider reads.
pub mod account_info;
/// The typed, time-parameterized capability query surface.
pub mod capability;
/// Small closed enumerations shared across requests, results and snapshots.
pub mod enums;
/// The trade error taxonomy.
pub mod error;
/// Event bus payload types.
pub mod event;
/// The immutable trade request submitted by callers.
pub mod request;
/// The mutable trade result owned by the enclosing transaction.
pub mod result;
/// The trade lifecycle state machine.
pub mod state;
/// Streaming price tick types.
pub mod tick;
/// The bound (request, result) transaction tracked by the engine.
pub mod transaction;

pub use account_info::AccountInfoSnapshot;
pub use capability::{RequestContext, RequestKind};
pub use enums::{AccountType, CurrencyType, OptionType, OrderDirection};
pub use error::TradeErrorCode;
pub use event::{
    AccountInfoUpdateEvent, AuthDataEvent, ConnectRequestEvent, DisconnectRequestEvent, Event,
    EventKind, OpenTradesEvent, PriceUpdateEvent, TradeRequestEvent, TradeStatusEvent,
};
pub use request::TradeRequest;
pub use result::TradeResult;
pub use state::TradeState;
pub use tick::{Tick, TickData, TickStatus};
pub use transaction::TradeTransaction;
