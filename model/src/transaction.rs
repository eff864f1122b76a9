//! The bound (request, result) transaction tracked by the engine.

use crate::request::TradeRequest;
use crate::result::TradeResult;
use std::sync::Mutex;

/// The fields an adapter thread is permitted to mutate directly on a live
/// transaction. Grouped here so the
/// mutex guarding them is the only place those writes happen.
#[derive(Debug)]
struct TransactionInner {
    request: TradeRequest,
    result: TradeResult,
}

/// The exactly-one-per-admitted-request pairing of a [`TradeRequest`] with
/// its mutable [`TradeResult`], plus the timestamp it was created.
///
/// The engine is the sole owner of a transaction's place in the
/// pending/open containers; an adapter that needs to mutate `open_price`,
/// `close_price`, timestamps, `trade_state`/`live_state`, `profit`,
/// `payout_rate` or `error_code` on a non-engine thread is handed an
/// `Arc<TradeTransaction>` through an event and must go through
/// [`TradeTransaction::with_result_mut`], then publish a status event so
/// the next engine tick observes the change.
#[derive(Debug)]
pub struct TradeTransaction {
    /// When this transaction was created (admitted into the pending queue), ms since epoch.
    pub created_at_ms: i64,
    inner: Mutex<TransactionInner>,
}

impl TradeTransaction {
    /// Create a new transaction pairing `request` with an empty result,
    /// stamping `place_date` and `created_at_ms` with `now_ms`.
    #[must_use]
    pub fn new(request: TradeRequest, now_ms: i64) -> Self {
        let mut result = TradeResult::default();
        result.place_date = now_ms;
        Self {
            created_at_ms: now_ms,
            inner: Mutex::new(TransactionInner { request, result }),
        }
    }

    /// A clone of the current request.
    #[must_use]
    pub fn request(&self) -> TradeRequest {
        self.lock().request.clone()
    }

    /// A clone of the current result.
    #[must_use]
    pub fn result(&self) -> TradeResult {
        self.lock().result.clone()
    }

    /// Read both halves of the transaction under one lock acquisition.
    pub fn snapshot(&self) -> (TradeRequest, TradeResult) {
        let guard = self.lock();
        (guard.request.clone(), guard.result.clone())
    }

    /// Mutate the result in place under the transaction's lock, returning
    /// whatever `f` returns. Used by both the engine's own phases and by
    /// adapter threads handed this transaction through an event.
    pub fn with_result_mut<T>(&self, f: impl FnOnce(&mut TradeResult) -> T) -> T {
        let mut guard = self.lock();
        f(&mut guard.result)
    }

    /// Invoke every callback on the request with the current result,
    /// exactly mirroring `TradeRequest::notify` but reading both fields
    /// from the shared lock in one step.
    pub fn notify(&self) {
        let guard = self.lock();
        guard.request.notify(&guard.result);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TransactionInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_invokes_every_registered_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let request = TradeRequest {
            callbacks: vec![Arc::new(move |_req, _res| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })],
            ..Default::default()
        };
        let transaction = TradeTransaction::new(request, 1_000);
        transaction.notify();
        transaction.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn with_result_mut_is_visible_to_subsequent_reads() {
        let transaction = TradeTransaction::new(TradeRequest::default(), 0);
        transaction.with_result_mut(|result| result.open_price = rust_decimal::Decimal::from(5));
        assert_eq!(transaction.result().open_price, rust_decimal::Decimal::from(5));
    }
}
