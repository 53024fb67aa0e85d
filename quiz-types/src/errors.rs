use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Why an action was ignored. State is left as it was and the UI plays a failure cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Rejection {
    AlreadyClaimed,
    NoActiveTile,
    TurnInProgress,
    UnknownTile,
    UnknownTeam,
    TileUsed,
    WrongPhase,
    AlreadyAttempted,
    NoArmedTeam,
    GameFinished,
}

impl Rejection {
    /// Stable reason code, identical to the serialized form
    pub fn code(self) -> &'static str {
        match self {
            Rejection::AlreadyClaimed => "already-claimed",
            Rejection::NoActiveTile => "no-active-tile",
            Rejection::TurnInProgress => "turn-in-progress",
            Rejection::UnknownTile => "unknown-tile",
            Rejection::UnknownTeam => "unknown-team",
            Rejection::TileUsed => "tile-used",
            Rejection::WrongPhase => "wrong-phase",
            Rejection::AlreadyAttempted => "already-attempted",
            Rejection::NoArmedTeam => "no-armed-team",
            Rejection::GameFinished => "game-finished",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for Rejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_matches_serialized_form() {
        let all = [
            Rejection::AlreadyClaimed,
            Rejection::NoActiveTile,
            Rejection::TurnInProgress,
            Rejection::UnknownTile,
            Rejection::UnknownTeam,
            Rejection::TileUsed,
            Rejection::WrongPhase,
            Rejection::AlreadyAttempted,
            Rejection::NoArmedTeam,
            Rejection::GameFinished,
        ];

        for rejection in all {
            let json = serde_json::to_value(rejection).unwrap();
            assert_eq!(json, rejection.code());
        }
    }
}
