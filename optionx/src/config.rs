//! Environment-driven configuration for the `optionx` binary. Every
//! setting has a safe default so the binary runs against an in-memory
//! capability provider with no broker configured out of the box;
//! supplying `OPTIONX_BROKER_BASE_URL` and `OPTIONX_BROKER_WS_URL` turns on
//! the reference Intrade Bar adapter.

use model::{AccountInfoSnapshot, AccountType, CurrencyType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Connection details for the reference Intrade Bar adapter, present only
/// when the broker environment variables are set.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Base URL of the REST API.
    pub base_url: String,
    /// WebSocket URL of the price-tick stream.
    pub ws_url: String,
    /// The session token the static session store hands to every request.
    pub session_token: String,
}

/// Top-level configuration for the composition root, assembled from
/// environment variables with hard-coded fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    /// The account this process manages.
    pub account_id: String,
    /// Symbols the in-memory capability provider accepts.
    pub symbols: Vec<String>,
    /// Starting account balance, demo-account defaults.
    pub initial_balance: Decimal,
    /// How often the scheduler drives `Engine::tick` and `EventBus::process`.
    pub tick_interval_ms: u64,
    /// Present only when `OPTIONX_BROKER_BASE_URL` and `OPTIONX_BROKER_WS_URL`
    /// are both set.
    pub broker: Option<BrokerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_id: "demo".to_string(),
            symbols: vec!["EURUSD".to_string(), "GBPUSD".to_string(), "USDJPY".to_string()],
            initial_balance: dec!(1000),
            tick_interval_ms: 250,
            broker: None,
        }
    }
}

impl Config {
    /// Read overrides from the process environment, falling back to
    /// [`Config::default`] for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(account_id) = std::env::var("OPTIONX_ACCOUNT_ID") {
            config.account_id = account_id;
        }
        if let Ok(symbols) = std::env::var("OPTIONX_SYMBOLS") {
            config.symbols = symbols.split(',').map(str::trim).filter(|s| !s.is_empty()).map(ToString::to_string).collect();
        }
        if let Ok(interval) = std::env::var("OPTIONX_TICK_INTERVAL_MS") {
            if let Ok(interval) = interval.parse() {
                config.tick_interval_ms = interval;
            }
        }

        if let (Ok(base_url), Ok(ws_url)) = (
            std::env::var("OPTIONX_BROKER_BASE_URL"),
            std::env::var("OPTIONX_BROKER_WS_URL"),
        ) {
            config.broker = Some(BrokerConfig {
                base_url,
                ws_url,
                session_token: std::env::var("OPTIONX_SESSION_TOKEN").unwrap_or_default(),
            });
        }

        config
    }

    /// The starting [`AccountInfoSnapshot`] for the in-memory capability
    /// provider: a connected demo account with generous limits and flat
    /// 0.8 payout on every configured symbol.
    #[must_use]
    pub fn initial_snapshot(&self) -> AccountInfoSnapshot {
        AccountInfoSnapshot {
            balance: self.initial_balance,
            currency: CurrencyType::Usd,
            account_type: AccountType::Demo,
            connected: true,
            open_trades: 0,
            max_trades: 10,
            min_amount: dec!(1),
            max_amount: dec!(5000),
            min_refund: dec!(0),
            max_refund: dec!(0.3),
            min_duration_secs: 5,
            max_duration_secs: 3_600,
            session_start_ms: 0,
            session_end_ms: i64::MAX,
            queue_timeout_ms: 10_000,
            response_timeout_ms: 10_000,
            order_interval_ms: 200,
            payout_by_symbol: self.symbols.iter().map(|symbol| (symbol.clone(), dec!(0.8))).collect::<HashMap<_, _>>(),
            default_payout_rate: dec!(0.7),
        }
    }
}
