use quiz_types::{OptionKey, Rejection, Standing, TeamId};
use serde::{Deserialize, Serialize};

/// Something the UI should react to (sound cue, confetti, toast) after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    TileTargeted {
        tile_index: usize,
        team_id: TeamId,
    },
    QuestionOpened {
        tile_index: usize,
        team_id: TeamId,
    },
    AnswerMissed {
        tile_index: usize,
        team_id: TeamId,
    },
    QuestionCancelled {
        tile_index: usize,
    },
    TileClaimed {
        tile_index: usize,
        team_id: TeamId,
        points: u32,
    },
    /// A claim completed one or more lines that were not complete before
    LineBonus {
        team_id: TeamId,
        lines: Vec<String>,
        bonus: u32,
    },
    /// A claim or pick was refused; the UI plays its failure cue
    ClaimFailed {
        reason: Rejection,
    },
    BoardReset,
    TeamSelected {
        team_id: TeamId,
    },
    TilePicked {
        tile_id: u32,
        team_id: TeamId,
    },
    StealOpened {
        tile_id: u32,
        missed_by: TeamId,
    },
    TeamArmed {
        tile_id: u32,
        team_id: TeamId,
    },
    StealMissed {
        tile_id: u32,
        team_id: TeamId,
        remaining: usize,
    },
    TileSolved {
        tile_id: u32,
        team_id: TeamId,
        points: u32,
    },
    TileExhausted {
        tile_id: u32,
        correct: OptionKey,
    },
    RevealAcknowledged {
        tile_id: u32,
    },
    ModalClosed {
        tile_id: u32,
    },
    GameEnded {
        standings: Vec<Standing>,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::TileTargeted { .. } => "tile_targeted",
            GameEvent::QuestionOpened { .. } => "question_opened",
            GameEvent::AnswerMissed { .. } => "answer_missed",
            GameEvent::QuestionCancelled { .. } => "question_cancelled",
            GameEvent::TileClaimed { .. } => "tile_claimed",
            GameEvent::LineBonus { .. } => "line_bonus",
            GameEvent::ClaimFailed { .. } => "claim_failed",
            GameEvent::BoardReset => "board_reset",
            GameEvent::TeamSelected { .. } => "team_selected",
            GameEvent::TilePicked { .. } => "tile_picked",
            GameEvent::StealOpened { .. } => "steal_opened",
            GameEvent::TeamArmed { .. } => "team_armed",
            GameEvent::StealMissed { .. } => "steal_missed",
            GameEvent::TileSolved { .. } => "tile_solved",
            GameEvent::TileExhausted { .. } => "tile_exhausted",
            GameEvent::RevealAcknowledged { .. } => "reveal_acknowledged",
            GameEvent::ModalClosed { .. } => "modal_closed",
            GameEvent::GameEnded { .. } => "game_ended",
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
