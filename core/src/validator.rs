//! The Trade Validator: a pure, stateless function executed at
//! admission. Order is normative — the first failing predicate determines
//! the returned error code, and test suites assert that order directly.

use crate::capability::AccountCapabilityProvider;
use model::{RequestContext, RequestKind, TradeErrorCode, TradeRequest};

/// Validate `request` against the capability provider's current answers,
/// implementing the sixteen-step ordered table exactly: symbol,
/// connection, availability (symbol/option/order/account/currency),
/// open-trades limit, amount bounds, refund bounds, duration/expiry
/// allowance, payout floor, and balance sufficiency, in that order.
pub fn validate(
    request: &TradeRequest,
    provider: &dyn AccountCapabilityProvider,
    now_ms: i64,
) -> Result<(), TradeErrorCode> {
    let ctx = |kind: RequestKind| RequestContext {
        kind,
        symbol: request.symbol.as_str(),
        option_type: Some(request.option_type),
        order_type: Some(request.direction),
        account_type: Some(request.account_type),
        currency: Some(request.currency),
        amount: Some(request.amount),
        duration_secs: request.duration_secs,
        expiry_time_secs: request.expiry_time_secs,
        min_payout: Some(request.min_payout),
        timestamp_ms: now_ms,
    };

    // 1. symbol non-empty
    if request.symbol.is_empty() {
        return Err(TradeErrorCode::InvalidSymbol);
    }
    // 2. connected
    if !provider.query_bool(&ctx(RequestKind::Connected)) {
        return Err(TradeErrorCode::NoConnection);
    }
    // 3. symbol available
    if !provider.query_bool(&ctx(RequestKind::SymbolAvailable)) {
        return Err(TradeErrorCode::InvalidSymbol);
    }
    // 4. option type available
    if !provider.query_bool(&ctx(RequestKind::OptionTypeAvailable)) {
        return Err(TradeErrorCode::InvalidOption);
    }
    // 5. order type available
    if !provider.query_bool(&ctx(RequestKind::OrderTypeAvailable)) {
        return Err(TradeErrorCode::InvalidOrder);
    }
    // 6. account type available
    if !provider.query_bool(&ctx(RequestKind::AccountTypeAvailable)) {
        return Err(TradeErrorCode::InvalidAccount);
    }
    // 7. currency available
    if !provider.query_bool(&ctx(RequestKind::CurrencyAvailable)) {
        return Err(TradeErrorCode::InvalidCurrency);
    }
    // 8. open-trades < max
    let open_trades = provider.query_i64(&ctx(RequestKind::OpenTrades));
    let max_trades = provider.query_i64(&ctx(RequestKind::MaxTrades));
    if open_trades >= max_trades {
        return Err(TradeErrorCode::LimitOpenTrades);
    }
    // 9. amount <= max
    if request.amount > provider.query_f64(&ctx(RequestKind::MaxAmount)) {
        return Err(TradeErrorCode::AmountTooHigh);
    }
    // 10. amount >= min
    if request.amount < provider.query_f64(&ctx(RequestKind::MinAmount)) {
        return Err(TradeErrorCode::AmountTooLow);
    }
    // 11. refund <= max
    if request.refund_rate > provider.query_f64(&ctx(RequestKind::MaxRefund)) {
        return Err(TradeErrorCode::RefundTooHigh);
    }
    // 12. refund >= min
    if request.refund_rate < provider.query_f64(&ctx(RequestKind::MinRefund)) {
        return Err(TradeErrorCode::RefundTooLow);
    }
    // 13. duration allowed
    if matches!(request.option_type, model::OptionType::Sprint)
        && !provider.query_bool(&ctx(RequestKind::DurationAllowed))
    {
        return Err(TradeErrorCode::InvalidDuration);
    }
    // 14. expiry allowed
    if matches!(request.option_type, model::OptionType::Classic)
        && !provider.query_bool(&ctx(RequestKind::ExpiryAllowed))
    {
        return Err(TradeErrorCode::InvalidExpiryTime);
    }
    // 15. payout >= min_payout
    if provider.query_f64(&ctx(RequestKind::PayoutRate)) < request.min_payout {
        return Err(TradeErrorCode::PayoutTooLow);
    }
    // 16. amount <= balance
    if request.amount > provider.query_f64(&ctx(RequestKind::Balance)) {
        return Err(TradeErrorCode::InsufficientBalance);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::InMemoryCapabilityProvider;
    use model::{AccountType, CurrencyType, OptionType, OrderDirection};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn snapshot() -> model::AccountInfoSnapshot {
        model::AccountInfoSnapshot {
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
            min_duration_secs: 5,
            max_duration_secs: 3600,
            session_start_ms: 0,
            session_end_ms: i64::MAX,
            queue_timeout_ms: 5_000,
            response_timeout_ms: 5_000,
            order_interval_ms: 1_000,
            payout_by_symbol: HashMap::from([("EURUSD".to_string(), dec!(0.8))]),
            default_payout_rate: dec!(0.7),
        }
    }

    fn provider() -> InMemoryCapabilityProvider {
        InMemoryCapabilityProvider::new(snapshot(), vec!["EURUSD".to_string()])
    }

    fn valid_request() -> TradeRequest {
        TradeRequest {
            symbol: "EURUSD".to_string(),
            option_type: OptionType::Sprint,
            direction: OrderDirection::Buy,
            amount: dec!(100),
            refund_rate: dec!(0.1),
            min_payout: dec!(0.5),
            duration_secs: Some(30),
            account_type: AccountType::Demo,
            currency: CurrencyType::Usd,
            ..Default::default()
        }
    }

    #[test]
    fn a_well_formed_request_passes_validation() {
        assert_eq!(validate(&valid_request(), &provider(), 0), Ok(()));
    }

    #[test]
    fn empty_symbol_fails_first_before_any_capability_query() {
        let request = TradeRequest {
            symbol: String::new(),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider(), 0),
            Err(TradeErrorCode::InvalidSymbol)
        );
    }

    #[test]
    fn disconnected_account_fails_before_symbol_availability() {
        let provider = provider();
        provider.set_connected(false);
        // A symbol the provider does not recognize either, so we can tell
        // which predicate actually fired.
        let request = TradeRequest {
            symbol: "NOPE".to_string(),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider, 0),
            Err(TradeErrorCode::NoConnection)
        );
    }

    #[test]
    fn open_trades_at_limit_is_reported_before_amount_checks() {
        let provider = provider();
        provider.set_open_trades(5);
        let request = TradeRequest {
            amount: dec!(1_000_000),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider, 0),
            Err(TradeErrorCode::LimitOpenTrades)
        );
    }

    #[test]
    fn amount_above_maximum_is_reported() {
        let request = TradeRequest {
            amount: dec!(600),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider(), 0),
            Err(TradeErrorCode::AmountTooHigh)
        );
    }

    #[test]
    fn amount_below_minimum_is_reported() {
        let request = TradeRequest {
            amount: dec!(1),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider(), 0),
            Err(TradeErrorCode::AmountTooLow)
        );
    }

    #[test]
    fn payout_below_requested_minimum_is_reported() {
        let request = TradeRequest {
            min_payout: dec!(0.95),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider(), 0),
            Err(TradeErrorCode::PayoutTooLow)
        );
    }

    #[test]
    fn amount_exceeding_balance_is_reported_last() {
        let provider = InMemoryCapabilityProvider::new(
            model::AccountInfoSnapshot {
                balance: dec!(50),
                max_amount: dec!(500),
                ..snapshot()
            },
            vec!["EURUSD".to_string()],
        );
        let request = TradeRequest {
            amount: dec!(100),
            ..valid_request()
        };
        assert_eq!(
            validate(&request, &provider, 0),
            Err(TradeErrorCode::InsufficientBalance)
        );
    }

    #[test]
    fn classic_option_checks_expiry_not_duration() {
        let request = TradeRequest {
            option_type: OptionType::Classic,
            duration_secs: None,
            expiry_time_secs: Some(3_600),
            ..valid_request()
        };
        assert_eq!(validate(&request, &provider(), 0), Ok(()));
    }
}
