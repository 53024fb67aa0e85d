use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category::OptionKey;
use crate::team::TeamId;

/// UI events that drive a Bingo board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum BingoAction {
    DropTeamOnTile {
        #[serde(rename = "tileIndex")]
        tile_index: usize,
        #[serde(rename = "teamId")]
        team_id: TeamId,
    },
    RevealFinished,
    AnswerWrong,
    AnswerCorrect,
    CancelQuestion,
    ResetClaimsOnly,
    EndGame,
}

/// UI events that drive a Category board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum CategoryAction {
    SelectTeam {
        #[serde(rename = "teamId")]
        team_id: TeamId,
    },
    PickTile {
        #[serde(rename = "tileId")]
        tile_id: u32,
        #[serde(rename = "teamId")]
        team_id: TeamId,
    },
    ArmTeam {
        #[serde(rename = "teamId")]
        team_id: TeamId,
    },
    SubmitAnswer {
        option: OptionKey,
    },
    AcknowledgeReveal,
    CloseModal,
    EndGame,
}
