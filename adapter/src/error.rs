//! Structural adapter errors — transport and wire failures that are not
//! themselves trade outcomes. A failure that concerns one transaction is
//! instead recorded as [`model::TradeErrorCode::ParsingError`] (or another
//! code) on that transaction's result; `AdapterError` is for failures that
//! have no single transaction to attach to, such as a lost WebSocket or a
//! malformed session.

use thiserror::Error;

/// Errors surfaced by the reference adapter's connection-lifecycle and
/// wire-protocol handling, logged by the `optionx` binary rather than
/// propagated into any `TradeResult`.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The HTTP client could not complete a request.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The WebSocket connection failed or was dropped unexpectedly.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    /// A broker response could not be parsed into the expected shape.
    #[error("failed to parse broker response: {0}")]
    Parse(#[from] serde_json::Error),
    /// The adapter attempted an operation while disconnected.
    #[error("adapter is not connected")]
    NotConnected,
    /// The session store could not supply valid credentials.
    #[error("session error: {0}")]
    Session(String),
}
