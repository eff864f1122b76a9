//! The Trade Lifecycle Engine: owns the pending/open transaction
//! queues, runs the admit/close-evaluate/finalize tick, and is the sole
//! mutator of the open-trades counter.

use crate::capability::AccountCapabilityProvider;
use crate::event_bus::EventBus;
use crate::module::Module;
use crate::validator::validate;
use model::{
    AccountType, CurrencyType, DisconnectRequestEvent, Event, EventKind, OpenTradesEvent,
    OptionType, OrderDirection, PriceUpdateEvent, TradeErrorCode, TradeRequest, TradeRequestEvent,
    TradeState, TradeStatusEvent, TradeTransaction,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// The single-threaded trade lifecycle engine. Admission, close-evaluation
/// and finalization all run inside [`Engine::tick`]; [`Engine::place_trade`]
/// and the event-bus-driven price/disconnect handlers may be called from
/// any thread, each touching only a short-lived mutex.
pub struct Engine {
    event_bus: Arc<EventBus>,
    provider: Arc<dyn AccountCapabilityProvider>,
    pending: Mutex<VecDeque<Arc<TradeTransaction>>>,
    open: Mutex<Vec<Arc<TradeTransaction>>>,
    open_trades: AtomicI64,
    last_admit_ms: AtomicI64,
    clock_ms: AtomicI64,
    shutdown: AtomicBool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pending_len", &self.lock_pending().len())
            .field("open_len", &self.lock_open().len())
            .field("open_trades", &self.open_trades.load(Ordering::SeqCst))
            .finish()
    }
}

impl Engine {
    /// Build an engine over `event_bus` and `provider`, subscribing to
    /// `PriceUpdateEvent` and `DisconnectRequestEvent` so the engine reacts
    /// to adapter-originated events without the caller having to forward
    /// them manually. The subscriptions hold only a weak reference back to
    /// the engine, so dropping the returned `Arc` tears them down.
    #[must_use]
    pub fn new(event_bus: Arc<EventBus>, provider: Arc<dyn AccountCapabilityProvider>) -> Arc<Self> {
        let engine = Arc::new(Self {
            event_bus: Arc::clone(&event_bus),
            provider,
            pending: Mutex::new(VecDeque::new()),
            open: Mutex::new(Vec::new()),
            open_trades: AtomicI64::new(0),
            last_admit_ms: AtomicI64::new(i64::MIN),
            clock_ms: AtomicI64::new(0),
            shutdown: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&engine);
        event_bus.subscribe(EventKind::PriceUpdate, move |event| {
            if let (Some(engine), Event::PriceUpdate(payload)) = (weak.upgrade(), event) {
                engine.handle_price_update(payload);
            }
        });

        let weak = Arc::downgrade(&engine);
        event_bus.subscribe(EventKind::DisconnectRequest, move |event| {
            if let (Some(engine), Event::DisconnectRequest(payload)) = (weak.upgrade(), event) {
                engine.handle_disconnect(payload);
            }
        });

        engine
    }

    /// Enqueue `request` for admission, stamping `place_date` with the
    /// current wall-clock time. Returns `true` unless the engine has
    /// already been shut down.
    pub fn place_trade(&self, request: TradeRequest) -> bool {
        self.place_trade_at(request, current_millis())
    }

    /// As [`Engine::place_trade`], but with an explicit timestamp — the
    /// form used by tests and by callers that already have a trusted clock
    /// reading, mirroring the scheduler's injected-time tests.
    pub fn place_trade_at(&self, request: TradeRequest, now_ms: i64) -> bool {
        if self.shutdown.load(Ordering::SeqCst) {
            return false;
        }
        self.observe_time(now_ms);
        let transaction = Arc::new(TradeTransaction::new(request, now_ms));
        self.lock_pending().push_back(transaction);
        true
    }

    /// Run the admit, close-evaluate, finalize phases once, in that order.
    /// A no-op once [`Engine::shutdown`] has been called.
    pub fn tick(&self, now_ms: i64) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        self.observe_time(now_ms);
        let admitted = self.admit(now_ms);
        self.close_evaluate(now_ms);
        let finalized = self.finalize();
        tracing::debug!(admitted, finalized, now_ms, "engine tick complete");
    }

    /// The current open-trades counter, equal to the number of open
    /// transactions whose `trade_state` is non-terminal.
    #[must_use]
    pub fn open_trades(&self) -> i64 {
        self.open_trades.load(Ordering::SeqCst)
    }

    /// Run the disconnect "finalize all" path and stop accepting new
    /// submissions or ticks. Scheduler tasks driving this engine are the
    /// caller's responsibility to cancel.
    pub fn shutdown(&self, now_ms: i64) {
        self.observe_time(now_ms);
        self.shutdown.store(true, Ordering::SeqCst);
        self.handle_disconnect(&DisconnectRequestEvent { callback: None });
    }

    fn admit(&self, now_ms: i64) -> usize {
        let snapshot = self.provider.snapshot(AccountType::Unknown, now_ms);

        for transaction in self.sweep_canceled(now_ms, snapshot.queue_timeout_ms) {
            let payout_rate = snapshot.payout_rate(&transaction.request().symbol);
            self.finalize_unopened(
                &transaction,
                TradeErrorCode::LongQueueWait,
                now_ms,
                snapshot.balance,
                payout_rate,
            );
        }

        let mut admitted_count = 0usize;
        loop {
            if self.lock_pending().is_empty() {
                break;
            }
            if now_ms.saturating_sub(self.last_admit_ms.load(Ordering::SeqCst))
                < snapshot.order_interval_ms
            {
                break;
            }
            if snapshot.open_trades >= snapshot.max_trades {
                break;
            }

            let Some(transaction) = self.lock_pending().pop_front() else {
                break;
            };

            let mut effective_request = transaction.request();
            if effective_request.account_type == AccountType::Unknown {
                effective_request.account_type = snapshot.account_type;
            }
            if effective_request.currency == CurrencyType::Unknown {
                effective_request.currency = snapshot.currency;
            }

            match validate(&effective_request, self.provider.as_ref(), now_ms) {
                Ok(()) => {
                    transaction.with_result_mut(|result| {
                        result.trade_state = TradeState::WaitingOpen;
                        result.live_state = TradeState::WaitingOpen;
                        result.send_date = now_ms;
                        result.balance = snapshot.balance;
                        result.payout_rate = snapshot.payout_rate(&effective_request.symbol);
                        result.account_type = effective_request.account_type;
                        result.currency = effective_request.currency;
                    });
                    self.increment_open_trades(&transaction);
                    transaction.notify();
                    self.event_bus.notify(&Event::TradeRequest(TradeRequestEvent {
                        transaction: Arc::clone(&transaction),
                    }));
                    self.lock_open().push(transaction);
                    self.last_admit_ms.store(now_ms, Ordering::SeqCst);
                    admitted_count = admitted_count.saturating_add(1);
                }
                Err(code) => {
                    let payout_rate = snapshot.payout_rate(&effective_request.symbol);
                    self.finalize_unopened(&transaction, code, now_ms, snapshot.balance, payout_rate);
                }
            }
        }
        admitted_count
    }

    fn sweep_canceled(&self, now_ms: i64, queue_timeout_ms: i64) -> Vec<Arc<TradeTransaction>> {
        let mut pending = self.lock_pending();
        let mut canceled = Vec::new();
        let mut index = 0;
        while index < pending.len() {
            let Some(transaction) = pending.get(index) else {
                break;
            };
            let place_date = transaction.result().place_date;
            if now_ms.saturating_sub(place_date) > queue_timeout_ms {
                if let Some(transaction) = pending.remove(index) {
                    canceled.push(transaction);
                }
            } else {
                index = index.saturating_add(1);
            }
        }
        canceled
    }

    fn close_evaluate(&self, now_ms: i64) {
        let snapshot = self.provider.snapshot(AccountType::Unknown, now_ms);
        let transactions: Vec<Arc<TradeTransaction>> = self.lock_open().clone();

        for transaction in &transactions {
            let (request, result) = transaction.snapshot();

            if result.trade_state == TradeState::OpenSuccess {
                transaction.with_result_mut(|r| {
                    r.trade_state = TradeState::InProgress;
                    r.live_state = TradeState::InProgress;
                });
                transaction.notify();
                continue;
            }

            if !matches!(result.trade_state, TradeState::InProgress | TradeState::WaitingClose) {
                continue;
            }

            let close_ms = if result.close_date > 0 {
                Some(result.close_date)
            } else {
                match request.option_type {
                    OptionType::Sprint => request.duration_secs.map(|duration| {
                        let base = result.open_date.max(result.send_date).max(result.place_date);
                        base.saturating_add(i64_from_u64(duration).saturating_mul(1000))
                    }),
                    OptionType::Classic => request
                        .expiry_time_secs
                        .map(|expiry| expiry.saturating_mul(1000)),
                }
            };

            let Some(close_ms) = close_ms else {
                let code = match request.option_type {
                    OptionType::Sprint => TradeErrorCode::InvalidDuration,
                    OptionType::Classic => TradeErrorCode::InvalidExpiryTime,
                };
                let payout_rate = snapshot.payout_rate(&request.symbol);
                mark_terminal(
                    &transaction,
                    code,
                    TradeState::CheckError,
                    now_ms,
                    snapshot.balance,
                    payout_rate,
                );
                continue;
            };

            if now_ms < close_ms {
                continue;
            }

            if now_ms > close_ms.saturating_add(snapshot.response_timeout_ms) {
                let payout_rate = snapshot.payout_rate(&request.symbol);
                mark_terminal(
                    &transaction,
                    TradeErrorCode::LongResponseWait,
                    TradeState::CheckError,
                    now_ms,
                    snapshot.balance,
                    payout_rate,
                );
                continue;
            }

            if result.trade_state != TradeState::WaitingClose {
                transaction.with_result_mut(|r| r.trade_state = TradeState::WaitingClose);
                transaction.notify();
                self.event_bus.notify(&Event::TradeStatus(TradeStatusEvent {
                    transaction: Arc::clone(transaction),
                }));
            }
        }
    }

    fn finalize(&self) -> usize {
        let finalized: Vec<Arc<TradeTransaction>> = {
            let mut open = self.lock_open();
            let mut kept = Vec::with_capacity(open.len());
            let mut finalized = Vec::new();
            for transaction in open.drain(..) {
                if transaction.result().trade_state.is_terminal() {
                    finalized.push(transaction);
                } else {
                    kept.push(transaction);
                }
            }
            *open = kept;
            finalized
        };
        let count = finalized.len();
        for transaction in finalized {
            self.decrement_open_trades(&transaction);
            transaction.notify();
        }
        count
    }

    fn handle_price_update(&self, payload: &PriceUpdateEvent) {
        let transactions: Vec<Arc<TradeTransaction>> = self.lock_open().clone();
        for transaction in &transactions {
            let (request, result) = transaction.snapshot();
            if !matches!(result.trade_state, TradeState::OpenSuccess | TradeState::InProgress) {
                continue;
            }
            let Some(tick) = payload
                .ticks
                .iter()
                .find(|tick| tick.symbol == request.symbol && tick.is_initialized())
            else {
                continue;
            };
            let mid = tick.mid_price();
            let live_state =
                evaluate_live_state(result.open_price, mid, request.direction, tick.price_digits);
            transaction.with_result_mut(|r| {
                r.close_price = mid;
                r.live_state = live_state;
            });
            transaction.notify();
        }
    }

    fn handle_disconnect(&self, payload: &DisconnectRequestEvent) {
        let now_ms = self.now_ms();
        let snapshot = self.provider.snapshot(AccountType::Unknown, now_ms);

        let pending: Vec<Arc<TradeTransaction>> = {
            let mut pending = self.lock_pending();
            pending.drain(..).collect()
        };
        for transaction in &pending {
            let payout_rate = snapshot.payout_rate(&transaction.request().symbol);
            self.finalize_unopened(
                transaction,
                TradeErrorCode::ClientForcedClose,
                now_ms,
                snapshot.balance,
                payout_rate,
            );
        }

        let open: Vec<Arc<TradeTransaction>> = {
            let mut open = self.lock_open();
            open.drain(..).collect()
        };
        for transaction in &open {
            let payout_rate = snapshot.payout_rate(&transaction.request().symbol);
            mark_terminal(
                transaction,
                TradeErrorCode::ClientForcedClose,
                TradeState::CheckError,
                now_ms,
                snapshot.balance,
                payout_rate,
            );
            self.decrement_open_trades(transaction);
            transaction.notify();
        }

        if let Some(callback) = &payload.callback {
            callback();
        }

        tracing::info!(
            pending_finalized = pending.len(),
            open_finalized = open.len(),
            "disconnect triggered finalize-all"
        );
    }

    fn finalize_unopened(
        &self,
        transaction: &Arc<TradeTransaction>,
        code: TradeErrorCode,
        now_ms: i64,
        balance: Decimal,
        payout_rate: Decimal,
    ) {
        if mark_terminal(transaction, code, TradeState::OpenError, now_ms, balance, payout_rate) {
            transaction.notify();
            tracing::warn!(error = %code, "transaction finalized before opening");
        }
    }

    fn increment_open_trades(&self, transaction: &Arc<TradeTransaction>) {
        let count = self.open_trades.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.event_bus.notify(&Event::OpenTrades(OpenTradesEvent {
            count,
            transaction: Arc::clone(transaction),
        }));
    }

    fn decrement_open_trades(&self, transaction: &Arc<TradeTransaction>) {
        let count = self
            .open_trades
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1)
            .max(0);
        self.event_bus.notify(&Event::OpenTrades(OpenTradesEvent {
            count,
            transaction: Arc::clone(transaction),
        }));
    }

    fn now_ms(&self) -> i64 {
        self.clock_ms.load(Ordering::SeqCst)
    }

    fn observe_time(&self, now_ms: i64) {
        self.clock_ms.fetch_max(now_ms, Ordering::SeqCst);
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<Arc<TradeTransaction>>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_open(&self) -> std::sync::MutexGuard<'_, Vec<Arc<TradeTransaction>>> {
        match self.open.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Module for Engine {
    /// `on_tick` drives the engine's admit/close-evaluate/finalize cycle,
    /// so the `optionx` binary can register the engine directly with its
    /// scheduler instead of hand-wiring a periodic task around `tick`.
    fn on_tick(&self, now_ms: i64) {
        self.tick(now_ms);
    }

    /// `on_shutdown` runs the disconnect finalize-all path with no further
    /// tick processing afterward.
    fn on_shutdown(&self) {
        self.shutdown(self.now_ms());
    }
}

/// Transition `transaction` to a terminal state recording `code`, unless it
/// is already terminal (a second finalize is a no-op). Snapshots `balance`
/// and `payout_rate` onto the result, matching the original
/// `utils_finalize_transaction_with_error`'s `get_account_info` read.
/// Returns whether this call actually performed the transition.
fn mark_terminal(
    transaction: &TradeTransaction,
    code: TradeErrorCode,
    state: TradeState,
    now_ms: i64,
    balance: Decimal,
    payout_rate: Decimal,
) -> bool {
    transaction.with_result_mut(|result| {
        if result.trade_state.is_terminal() {
            return false;
        }
        result.set_error(code, None);
        result.trade_state = state;
        result.live_state = state;
        result.balance = balance;
        result.payout_rate = payout_rate;
        if result.send_date == 0 {
            result.send_date = now_ms;
        }
        if result.open_date == 0 {
            result.open_date = now_ms;
        }
        result.close_date = now_ms;
        true
    })
}

/// Ties at the symbol's declared precision report `STANDOFF`, as does an
/// unset open price.
fn evaluate_live_state(
    open_price: Decimal,
    mid: Decimal,
    direction: OrderDirection,
    price_digits: u32,
) -> TradeState {
    if open_price.is_zero() {
        return TradeState::Standoff;
    }
    let open_price = open_price.round_dp(price_digits);
    let mid = mid.round_dp(price_digits);
    match direction {
        OrderDirection::Buy => match mid.cmp(&open_price) {
            std::cmp::Ordering::Greater => TradeState::Win,
            std::cmp::Ordering::Less => TradeState::Loss,
            std::cmp::Ordering::Equal => TradeState::Standoff,
        },
        OrderDirection::Sell => match mid.cmp(&open_price) {
            std::cmp::Ordering::Less => TradeState::Win,
            std::cmp::Ordering::Greater => TradeState::Loss,
            std::cmp::Ordering::Equal => TradeState::Standoff,
        },
    }
}

fn i64_from_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn current_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::InMemoryCapabilityProvider;
    use model::{AccountInfoSnapshot, CurrencyType, Tick, TickData, TickStatus};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn snapshot() -> AccountInfoSnapshot {
        AccountInfoSnapshot {
            balance: dec!(1000),
            currency: CurrencyType::Usd,
            account_type: AccountType::Demo,
            connected: true,
            open_trades: 0,
            max_trades: 5,
            min_amount: dec!(10),
            max_amount: dec!(500),
            min_refund: dec!(0),
            max_refund: dec!(0.2),
            min_duration_secs: 1,
            max_duration_secs: 3600,
            session_start_ms: 0,
            session_end_ms: i64::MAX,
            queue_timeout_ms: 1_000,
            response_timeout_ms: 3_000,
            order_interval_ms: 0,
            payout_by_symbol: HashMap::from([("EURUSD".to_string(), dec!(0.8))]),
            default_payout_rate: dec!(0.7),
        }
    }

    fn engine() -> (Arc<Engine>, Arc<InMemoryCapabilityProvider>, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let provider = Arc::new(InMemoryCapabilityProvider::new(
            snapshot(),
            vec!["EURUSD".to_string()],
        ));
        let engine = Engine::new(Arc::clone(&bus), provider.clone());
        (engine, provider, bus)
    }

    fn request_with_callback(calls: Arc<Mutex<Vec<TradeState>>>) -> TradeRequest {
        TradeRequest {
            symbol: "EURUSD".to_string(),
            option_type: OptionType::Sprint,
            direction: OrderDirection::Buy,
            amount: dec!(100),
            refund_rate: dec!(0.1),
            min_payout: dec!(0.5),
            duration_secs: Some(10),
            callbacks: vec![Arc::new(move |_req: &TradeRequest, result: &model::TradeResult| {
                calls.lock().unwrap_or_else(|e| e.into_inner()).push(result.trade_state);
            })],
            ..Default::default()
        }
    }

    #[test]
    fn place_trade_enqueues_and_admits_on_next_tick() {
        let (engine, _provider, _bus) = engine();
        let calls = Arc::new(Mutex::new(Vec::new()));
        assert!(engine.place_trade_at(request_with_callback(Arc::clone(&calls)), 0));
        engine.tick(0);
        assert_eq!(engine.open_trades(), 1);
        assert_eq!(*calls.lock().unwrap_or_else(|e| e.into_inner()), vec![TradeState::WaitingOpen]);
    }

    #[test]
    fn empty_symbol_finalizes_with_open_error_and_never_opens() {
        let (engine, _provider, _bus) = engine();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut request = request_with_callback(Arc::clone(&calls));
        request.symbol = String::new();
        engine.place_trade_at(request, 0);
        engine.tick(0);
        assert_eq!(engine.open_trades(), 0);
        assert_eq!(*calls.lock().unwrap_or_else(|e| e.into_inner()), vec![TradeState::OpenError]);
    }

    #[test]
    fn price_update_drives_live_state_to_win_for_a_buy_above_open() {
        let (engine, _provider, bus) = engine();
        let calls = Arc::new(Mutex::new(Vec::new()));
        engine.place_trade_at(request_with_callback(Arc::clone(&calls)), 0);
        engine.tick(0);

        // Simulate the adapter's open confirmation.
        let transaction = engine.lock_open().first().cloned().expect("one open transaction");
        transaction.with_result_mut(|r| {
            r.trade_state = TradeState::OpenSuccess;
            r.open_price = dec!(1.12335);
            r.open_date = 0;
        });

        engine.tick(0); // OPEN_SUCCESS -> IN_PROGRESS

        bus.notify(&Event::PriceUpdate(PriceUpdateEvent {
            ticks: vec![TickData {
                symbol: "EURUSD".to_string(),
                price_digits: 5,
                volume_digits: 2,
                provider: "test".to_string(),
                tick: Tick {
                    bid: dec!(1.12340),
                    ask: dec!(1.12350),
                    last_volume: dec!(0),
                    exchange_ms: 0,
                    received_ms: 0,
                    update_flags: 0,
                },
                status: TickStatus { initialized: true, realtime: true },
            }],
        }));

        let result = transaction.result();
        assert_eq!(result.live_state, TradeState::Win);
        assert_eq!(result.close_price, dec!(1.12345));
    }

    #[test]
    fn disconnect_finalizes_pending_and_open_transactions_and_zeroes_the_counter() {
        let (engine, _provider, bus) = engine();
        let calls = Arc::new(Mutex::new(Vec::new()));
        engine.place_trade_at(request_with_callback(Arc::clone(&calls)), 0);
        engine.tick(0);
        assert_eq!(engine.open_trades(), 1);

        bus.notify(&Event::DisconnectRequest(DisconnectRequestEvent { callback: None }));

        assert_eq!(engine.open_trades(), 0);
        let last = *calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .expect("at least one callback fired");
        assert_eq!(last, TradeState::CheckError);
    }

    #[test]
    fn finalize_of_an_already_terminal_transaction_is_a_no_op() {
        let transaction = Arc::new(TradeTransaction::new(TradeRequest::default(), 0));
        assert!(mark_terminal(
            &transaction,
            TradeErrorCode::InvalidSymbol,
            TradeState::OpenError,
            0,
            dec!(1000),
            dec!(0.8),
        ));
        assert!(!mark_terminal(
            &transaction,
            TradeErrorCode::InsufficientBalance,
            TradeState::CheckError,
            10,
            dec!(500),
            dec!(0.7),
        ));
        assert_eq!(transaction.result().trade_state, TradeState::OpenError);
        assert_eq!(transaction.result().balance, dec!(1000));
        assert_eq!(transaction.result().payout_rate, dec!(0.8));
    }

    #[test]
    fn rate_limited_admission_only_admits_one_per_tick() {
        let bus = Arc::new(EventBus::new());
        let mut limited_snapshot = snapshot();
        limited_snapshot.order_interval_ms = 500;
        let provider = Arc::new(InMemoryCapabilityProvider::new(
            limited_snapshot,
            vec!["EURUSD".to_string()],
        ));
        let engine = Engine::new(Arc::clone(&bus), provider);

        let admitted_count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let admitted_count = Arc::clone(&admitted_count);
            let request = TradeRequest {
                symbol: "EURUSD".to_string(),
                option_type: OptionType::Sprint,
                direction: OrderDirection::Buy,
                amount: dec!(100),
                refund_rate: dec!(0.1),
                min_payout: dec!(0.5),
                duration_secs: Some(10),
                callbacks: vec![Arc::new(move |_req: &TradeRequest, result: &model::TradeResult| {
                    if result.trade_state == TradeState::WaitingOpen {
                        admitted_count.fetch_add(1, AtomicOrdering::SeqCst);
                    }
                })],
                ..Default::default()
            };
            engine.place_trade_at(request, 0);
        }

        engine.tick(0);
        assert_eq!(admitted_count.load(AtomicOrdering::SeqCst), 1);
        engine.tick(500);
        assert_eq!(admitted_count.load(AtomicOrdering::SeqCst), 2);
        engine.tick(1_000);
        assert_eq!(admitted_count.load(AtomicOrdering::SeqCst), 3);
    }
}
