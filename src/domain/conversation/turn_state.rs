//! Per-turn state of a conversation session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where the session is within the current turn.
///
/// - `Idle`: ready for input
/// - `Sending`: a routed turn is in flight
/// - `AwaitingEscalation`: the placeholder is shown, retrieval is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    Sending,
    AwaitingEscalation,
}

impl TurnState {
    /// True while a turn is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, TurnState::Idle)
    }
}

impl StateMachine for TurnState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TurnState::*;
        matches!(
            (self, target),
            (Idle, Sending) | (Sending, Idle) | (Sending, AwaitingEscalation) | (AwaitingEscalation, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TurnState::*;
        match self {
            Idle => vec![Sending],
            Sending => vec![Idle, AwaitingEscalation],
            AwaitingEscalation => vec![Idle],
        }
    }
}
