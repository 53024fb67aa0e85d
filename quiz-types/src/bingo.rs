use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::team::{Team, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BingoQuestion {
    pub id: String,
    pub game: String, // Normalized topic code
    pub question: String,
    pub answer: String,
    pub points: u32,
    pub time_limit_sec: u32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BingoTile {
    pub id: String,
    pub question: BingoQuestion,
    pub claimed_by_team_id: Option<TeamId>,
}

impl BingoTile {
    pub fn points(&self) -> u32 {
        self.question.points
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by_team_id.is_some()
    }

    pub fn is_claimed_by(&self, team_id: &str) -> bool {
        self.claimed_by_team_id.as_deref() == Some(team_id)
    }
}

/// Turn phase of a Bingo board. Tile indices point into `BingoState::tiles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "phase", rename_all = "camelCase")]
#[ts(export)]
pub enum BingoPhase {
    Idle,
    /// A team was dropped on a tile; the caller is playing the reveal and countdown
    PendingReveal {
        #[serde(rename = "tileIndex")]
        tile_index: usize,
    },
    /// The question is open for the selected team
    Active {
        #[serde(rename = "tileIndex")]
        tile_index: usize,
    },
    Finished,
}

impl BingoPhase {
    /// Index of the tile currently in play, if any
    pub fn tile_index(&self) -> Option<usize> {
        match self {
            BingoPhase::PendingReveal { tile_index } | BingoPhase::Active { tile_index } => {
                Some(*tile_index)
            }
            BingoPhase::Idle | BingoPhase::Finished => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BingoState {
    pub topic: String,
    pub teams: Vec<Team>,
    pub tiles: Vec<BingoTile>,
    pub phase: BingoPhase,
    pub selected_team_id: Option<TeamId>,
}

impl BingoState {
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.selected_team_id
            .as_deref()
            .and_then(|id| self.team(id))
    }

    /// Tile targeted by the current turn, pending or open
    pub fn active_tile(&self) -> Option<&BingoTile> {
        self.phase.tile_index().and_then(|i| self.tiles.get(i))
    }

    pub fn claimed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_claimed()).count()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BingoPhase::Finished)
    }
}
