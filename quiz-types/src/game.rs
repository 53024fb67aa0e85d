use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::team::Team;

/// The team games driven by a turn engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GameKind {
    Bingo,
    Category,
}

impl GameKind {
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Bingo => "Bingo",
            GameKind::Category => "Category",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One row of the final results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Standing {
    pub rank: u32, // Competition rank: tied scores share a rank
    pub team: Team,
}
