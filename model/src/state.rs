//! The trade lifecycle state machine shared by `trade_state` and `live_state`.

use std::fmt;

/// A state in the trade lifecycle.
///
/// Applies to both `TradeResult::trade_state` (the authoritative lifecycle
/// position) and `TradeResult::live_state` (the provisional, price-driven
/// outcome, which may oscillate while `trade_state` is non-terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TradeState {
    /// No lifecycle activity yet.
    #[default]
    Unknown,
    /// Admitted; awaiting the adapter's open confirmation.
    WaitingOpen,
    /// The adapter confirmed the order was opened.
    OpenSuccess,
    /// The trade is live; `live_state` tracks the market.
    InProgress,
    /// Close time has been reached; awaiting settlement from the adapter.
    WaitingClose,
    /// Settled a win.
    Win,
    /// Settled a loss.
    Loss,
    /// Settled flat (tie at settlement).
    Standoff,
    /// Settled with the stake refunded.
    Refund,
    /// Terminal error sink for failures before the order was opened.
    OpenError,
    /// Terminal error sink for failures after the order was opened.
    CheckError,
}

impl TradeState {
    /// Terminal states are never left; `live_state == trade_state` once one
    /// is reached.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TradeState::Win
                | TradeState::Loss
                | TradeState::Standoff
                | TradeState::Refund
                | TradeState::OpenError
                | TradeState::CheckError
        )
    }

    /// True for the states `live_state` may oscillate among while
    /// `trade_state` is non-terminal: `{IN_PROGRESS, WIN, LOSS, STANDOFF}`.
    #[must_use]
    pub fn is_live_outcome(self) -> bool {
        matches!(
            self,
            TradeState::InProgress | TradeState::Win | TradeState::Loss | TradeState::Standoff
        )
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeState::Unknown => "UNKNOWN",
            TradeState::WaitingOpen => "WAITING_OPEN",
            TradeState::OpenSuccess => "OPEN_SUCCESS",
            TradeState::InProgress => "IN_PROGRESS",
            TradeState::WaitingClose => "WAITING_CLOSE",
            TradeState::Win => "WIN",
            TradeState::Loss => "LOSS",
            TradeState::Standoff => "STANDOFF",
            TradeState::Refund => "REFUND",
            TradeState::OpenError => "OPEN_ERROR",
            TradeState::CheckError => "CHECK_ERROR",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_exactly_the_documented_set() {
        for state in [
            TradeState::Win,
            TradeState::Loss,
            TradeState::Standoff,
            TradeState::Refund,
            TradeState::OpenError,
            TradeState::CheckError,
        ] {
            assert!(state.is_terminal());
        }
        for state in [
            TradeState::Unknown,
            TradeState::WaitingOpen,
            TradeState::OpenSuccess,
            TradeState::InProgress,
            TradeState::WaitingClose,
        ] {
            assert!(!state.is_terminal());
        }
    }
}
