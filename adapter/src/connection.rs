//! The connection-lifecycle state machine coupling the adapter to the
//! event bus, generalized from a stock-broker WebSocket reconciliation
//! lifecycle to the binary-options adapter's authenticate/subscribe/stream
//! lifecycle.

use std::time::{Duration, Instant};
use thiserror::Error;

/// Exponential backoff parameters for reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Base delay, milliseconds.
    pub base_delay_ms: u64,
    /// Delay ceiling, milliseconds.
    pub max_delay_ms: u64,
    /// Exponent ceiling (`2^max_exponent` multiplies the base delay).
    pub max_exponent: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_exponent: 5,
        }
    }
}

/// Raised when a [`ConnectionState::transition`] is attempted that the
/// state machine does not allow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid connection transition: {from:?} cannot transition via {transition:?}")]
pub struct ConnectionError {
    /// The state the transition was attempted from.
    pub from: ConnectionState,
    /// The transition that was rejected.
    pub transition: ConnectionTransition,
}

/// States of the adapter's connection to the broker backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// No session established.
    Disconnected,
    /// Authenticating and opening the price WebSocket.
    Connecting,
    /// Connected; fully able to place and settle trades.
    Live,
    /// Connection lost; waiting out a backoff delay before retrying.
    Reconnecting {
        /// Retry attempt count, starting at 1.
        attempt: u32,
        /// When the next retry is due.
        next_retry: Instant,
        /// The backoff configuration in effect.
        config: BackoffConfig,
    },
}

/// Inputs that drive [`ConnectionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionTransition {
    /// Begin authenticating.
    Connect,
    /// Authentication and WebSocket handshake both succeeded.
    Established,
    /// The connection was lost or a request failed with a transport error.
    Lost,
    /// The backoff delay elapsed; retry now.
    Retry,
    /// The caller or the engine requested a disconnect.
    Disconnect,
}

impl ConnectionState {
    /// Attempt `transition` from the current state, using the real clock
    /// for any timestamp the new state records.
    pub fn transition(self, transition: ConnectionTransition) -> Result<Self, ConnectionError> {
        self.transition_at(transition, Instant::now())
    }

    /// As [`ConnectionState::transition`], with an injected `now` for tests.
    pub fn transition_at(
        self,
        transition: ConnectionTransition,
        now: Instant,
    ) -> Result<Self, ConnectionError> {
        match (&self, transition) {
            (ConnectionState::Disconnected, ConnectionTransition::Connect) => {
                Ok(ConnectionState::Connecting)
            }
            (ConnectionState::Connecting, ConnectionTransition::Established) => {
                Ok(ConnectionState::Live)
            }
            (ConnectionState::Connecting, ConnectionTransition::Lost)
            | (ConnectionState::Live, ConnectionTransition::Lost) => {
                let config = BackoffConfig::default();
                Ok(ConnectionState::Reconnecting {
                    attempt: 1,
                    next_retry: now + Self::backoff(1, &config),
                    config,
                })
            }
            (ConnectionState::Reconnecting { .. }, ConnectionTransition::Retry) => {
                Ok(ConnectionState::Connecting)
            }
            (_, ConnectionTransition::Disconnect) => Ok(ConnectionState::Disconnected),
            (state, transition) => Err(ConnectionError {
                from: state.clone(),
                transition,
            }),
        }
    }

    /// True only in [`ConnectionState::Live`] — the only state in which the
    /// capability provider should report `Connected == true` and the
    /// adapter should accept new `TradeRequestEvent`s.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Live)
    }

    /// The delay remaining before a reconnect attempt is due, zero outside
    /// [`ConnectionState::Reconnecting`].
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        match self {
            ConnectionState::Reconnecting { next_retry, .. } => {
                next_retry.saturating_duration_since(Instant::now())
            }
            _ => Duration::ZERO,
        }
    }

    fn backoff(attempt: u32, config: &BackoffConfig) -> Duration {
        let exponent = attempt.saturating_sub(1).min(config.max_exponent);
        let delay_ms = config
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(exponent))
            .min(config.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}
