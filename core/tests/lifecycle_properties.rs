//! Property tests over arbitrary interleavings of submission, price-update
//! and disconnect events, checking invariants that must hold no matter the
//! interleaving rather than any single scenario's exact sequence.

use core::{Engine, EventBus, InMemoryCapabilityProvider};
use model::{
    AccountInfoSnapshot, AccountType, CurrencyType, DisconnectRequestEvent, Event, OptionType,
    OrderDirection, PriceUpdateEvent, Tick, TickData, TickStatus, TradeRequest, TradeState,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn snapshot() -> AccountInfoSnapshot {
    AccountInfoSnapshot {
        balance: dec!(10_000),
        currency: CurrencyType::Usd,
        account_type: AccountType::Demo,
        connected: true,
        open_trades: 0,
        max_trades: 20,
        min_amount: dec!(1),
        max_amount: dec!(5_000),
        min_refund: dec!(0),
        max_refund: dec!(0.3),
        min_duration_secs: 1,
        max_duration_secs: 3_600,
        session_start_ms: 0,
        session_end_ms: i64::MAX,
        queue_timeout_ms: 5_000,
        response_timeout_ms: 5_000,
        order_interval_ms: 0,
        payout_by_symbol: HashMap::from([("EURUSD".to_string(), dec!(0.8))]),
        default_payout_rate: dec!(0.7),
    }
}

fn harness() -> (Arc<Engine>, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new());
    let provider = Arc::new(InMemoryCapabilityProvider::new(snapshot(), vec!["EURUSD".to_string()]));
    let engine = Engine::new(Arc::clone(&bus), provider);
    (engine, bus)
}

/// A mock adapter that auto-opens every admitted transaction at a fixed
/// price. The sole observable thing it adds beyond the engine itself.
fn auto_open_adapter(bus: &Arc<EventBus>, open_price: Decimal) {
    bus.subscribe(model::EventKind::TradeRequest, move |event| {
        if let Event::TradeRequest(model::TradeRequestEvent { transaction }) = event {
            transaction.with_result_mut(|result| {
                result.trade_state = TradeState::OpenSuccess;
                result.live_state = TradeState::OpenSuccess;
                result.open_price = open_price;
            });
            transaction.notify();
        }
    });
}

fn request_with_log(log: Arc<Mutex<Vec<TradeState>>>, amount: Decimal, duration_secs: u64) -> TradeRequest {
    TradeRequest {
        symbol: "EURUSD".to_string(),
        option_type: OptionType::Sprint,
        direction: OrderDirection::Buy,
        amount,
        refund_rate: dec!(0.1),
        min_payout: dec!(0.5),
        duration_secs: Some(duration_secs),
        callbacks: vec![Arc::new(move |_req: &TradeRequest, result: &model::TradeResult| {
            log.lock().unwrap_or_else(|e| e.into_inner()).push(result.trade_state);
        })],
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
enum Step {
    Submit { amount: i64, duration_secs: u64 },
    Tick { advance_ms: i64 },
    PriceUpdate { bid_offset: i32 },
    Disconnect,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1i64..=4_000, 1u64..=20).prop_map(|(amount, duration_secs)| Step::Submit { amount, duration_secs }),
        (10i64..=2_000).prop_map(|advance_ms| Step::Tick { advance_ms }),
        (-50i32..=50).prop_map(|bid_offset| Step::PriceUpdate { bid_offset }),
        Just(Step::Disconnect),
    ]
}

proptest! {
    /// Every submitted request's callback log ends in a terminal state, and
    /// never logs more than one terminal state. This holds for any
    /// interleaving of submissions, ticks, price updates, and disconnects.
    #[test]
    fn every_request_eventually_reaches_exactly_one_terminal_state(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let (engine, bus) = harness();
        auto_open_adapter(&bus, dec!(1.10000));
        let mut logs: Vec<Arc<Mutex<Vec<TradeState>>>> = Vec::new();
        let mut now_ms: i64 = 0;

        for step in steps {
            match step {
                Step::Submit { amount, duration_secs } => {
                    let log = Arc::new(Mutex::new(Vec::new()));
                    let request = request_with_log(Arc::clone(&log), Decimal::from(amount), duration_secs);
                    engine.place_trade_at(request, now_ms);
                    logs.push(log);
                }
                Step::Tick { advance_ms } => {
                    now_ms = now_ms.saturating_add(advance_ms);
                    engine.tick(now_ms);
                }
                Step::PriceUpdate { bid_offset } => {
                    let bid = dec!(1.10000) + Decimal::new(i64::from(bid_offset), 5);
                    bus.notify(&Event::PriceUpdate(PriceUpdateEvent {
                        ticks: vec![TickData {
                            symbol: "EURUSD".to_string(),
                            price_digits: 5,
                            volume_digits: 2,
                            provider: "test".to_string(),
                            tick: Tick {
                                bid,
                                ask: bid + dec!(0.00010),
                                last_volume: dec!(0),
                                exchange_ms: now_ms,
                                received_ms: now_ms,
                                update_flags: 0,
                            },
                            status: TickStatus { initialized: true, realtime: true },
                        }],
                    }));
                }
                Step::Disconnect => {
                    bus.notify(&Event::DisconnectRequest(DisconnectRequestEvent { callback: None }));
                }
            }
        }

        // Force-close anything still open so every submitted request settles
        // before the property is checked.
        bus.notify(&Event::DisconnectRequest(DisconnectRequestEvent { callback: None }));

        for log in &logs {
            let entries = log.lock().unwrap_or_else(|e| e.into_inner());
            let terminal_count = entries.iter().filter(|state| state.is_terminal()).count();
            prop_assert!(terminal_count >= 1, "every submitted request must reach a terminal state");
            prop_assert_eq!(terminal_count, 1, "a transaction must finalize exactly once");
        }

        prop_assert_eq!(engine.open_trades(), 0, "disconnect must drain the open-trades counter to zero");
    }

    /// The open-trades counter never goes negative and never exceeds the
    /// number of requests submitted so far, across any interleaving.
    #[test]
    fn open_trades_counter_stays_within_bounds(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let (engine, bus) = harness();
        auto_open_adapter(&bus, dec!(1.10000));
        let mut submitted = 0i64;
        let mut now_ms: i64 = 0;

        for step in steps {
            match step {
                Step::Submit { amount, duration_secs } => {
                    let log = Arc::new(Mutex::new(Vec::new()));
                    let request = request_with_log(log, Decimal::from(amount), duration_secs);
                    engine.place_trade_at(request, now_ms);
                    submitted = submitted.saturating_add(1);
                }
                Step::Tick { advance_ms } => {
                    now_ms = now_ms.saturating_add(advance_ms);
                    engine.tick(now_ms);
                }
                Step::PriceUpdate { .. } | Step::Disconnect => {
                    if matches!(step, Step::Disconnect) {
                        bus.notify(&Event::DisconnectRequest(DisconnectRequestEvent { callback: None }));
                    }
                }
            }
            let open_trades = engine.open_trades();
            prop_assert!(open_trades >= 0, "open-trades counter must never go negative");
            prop_assert!(open_trades <= submitted, "open-trades counter must never exceed submitted requests");
        }
    }
}
