//! OptionX Binary - Composition Root
//!
//! Wires the account capability provider, event bus, scheduler, trade
//! lifecycle engine and (optionally) the reference Intrade Bar adapter
//! together and drives the engine's tick loop. This crate owns no trade
//! lifecycle logic of its own: every decision made here is either reading
//! configuration or handing an already-built component to another one's
//! constructor.

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

mod config;

use adapter::{IntradeBarAdapter, IntradeBarConfig, StaticSessionStore};
use anyhow::Result;
use config::Config;
use core::{AccountCapabilityProvider, Engine, EventBus, InMemoryCapabilityProvider, Module, Scheduler};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = Config::from_env();
    info!(?config, "starting optionx");

    let event_bus = Arc::new(EventBus::new());
    let provider: Arc<dyn AccountCapabilityProvider> = Arc::new(InMemoryCapabilityProvider::new(
        config.initial_snapshot(),
        config.symbols.clone(),
    ));
    let engine = Engine::new(Arc::clone(&event_bus), Arc::clone(&provider));
    let scheduler = Arc::new(Scheduler::new());

    let adapter = config.broker.as_ref().map(|broker| {
        let store = Arc::new(StaticSessionStore::new(
            config.account_id.clone(),
            broker.session_token.clone(),
        ));
        let intrade_bar_config = IntradeBarConfig {
            base_url: broker.base_url.clone(),
            ws_url: broker.ws_url.clone(),
            account_id: config.account_id.clone(),
        };
        IntradeBarAdapter::new(intrade_bar_config, Arc::clone(&event_bus), store, tokio::runtime::Handle::current())
    });
    if let Some(adapter) = &adapter {
        adapter.on_start();
    }

    let tick_engine = Arc::clone(&engine);
    let tick_bus = Arc::clone(&event_bus);
    scheduler.submit_periodic(Some("engine-tick"), now_ms(), config.tick_interval_ms, move || {
        tick_bus.process();
        tick_engine.tick(now_ms());
    });

    let worker = scheduler.run_owned_worker(Duration::from_millis(config.tick_interval_ms), now_ms);

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler.shutdown();
    engine.on_shutdown();
    if let Some(adapter) = &adapter {
        adapter.on_shutdown();
    }
    drop(worker);

    Ok(())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
