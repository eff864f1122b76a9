//! OptionX Core Crate - Trade Lifecycle Engine
//!
//! This crate contains the five cooperating components that make up the
//! trade lifecycle core: the account capability provider, the event bus,
//! the task scheduler, the trade validator, and the trade lifecycle
//! engine itself. The concrete HTTP/WebSocket broker conversation lives
//! in the `adapter` crate; this crate never performs I/O.

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

/// The Account Capability Provider: a typed, read-only oracle over
/// account limits, symbol/option availability, payout, and connection status.
pub mod capability;
/// The Trade Lifecycle Engine: owns the pending/open queues and runs
/// the admit/close-evaluate/finalize tick.
pub mod engine;
/// The Event Bus: typed synchronous + asynchronous pub/sub.
pub mod event_bus;
/// The `Module` capability interface: a single `on_start` / `on_tick` /
/// `on_shutdown` trait every tickable component implements.
pub mod module;
/// The Task Scheduler: named single-shot / delayed / periodic tasks.
pub mod scheduler;
/// The Trade Validator: the pure, ordered sixteen-predicate function.
pub mod validator;

pub use capability::{AccountCapabilityProvider, InMemoryCapabilityProvider};
pub use engine::Engine;
pub use event_bus::{EventBus, EventListener, SubscriberId};
pub use module::Module;
pub use scheduler::{Scheduler, TaskHandle};
pub use validator::validate;
