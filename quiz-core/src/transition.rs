use quiz_types::Rejection;

use crate::errors::SetupError;
use crate::game_events::GameEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(Vec<GameEvent>),
    Rejected(Rejection),
}

/// Result of feeding one action to an engine: the next state plus what happened.
/// A rejected action hands back the input state unchanged, except when an open
/// Bingo question fails its final claim check and is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    pub state: S,
    pub outcome: Outcome,
}

impl<S> Transition<S> {
    pub(crate) fn applied(state: S, events: Vec<GameEvent>) -> Self {
        Self {
            state,
            outcome: Outcome::Applied(events),
        }
    }

    pub(crate) fn rejected(state: S, reason: Rejection) -> Self {
        Self {
            state,
            outcome: Outcome::Rejected(reason),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, Outcome::Applied(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self.outcome {
            Outcome::Rejected(reason) => Some(reason),
            Outcome::Applied(_) => None,
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        match &self.outcome {
            Outcome::Applied(events) => events,
            Outcome::Rejected(_) => &[],
        }
    }
}

/// A pure turn engine: `apply` never mutates its input
pub trait TurnEngine {
    type State: Clone;
    type Action;

    fn apply(&self, state: &Self::State, action: Self::Action) -> Transition<Self::State>;

    /// Defensive consistency check run by sessions after every applied transition
    fn check_invariants(&self, state: &Self::State) -> Result<(), SetupError>;
}
