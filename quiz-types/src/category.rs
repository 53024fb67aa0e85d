use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::team::{Team, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Parse a loader value such as `"b"` or `" B "`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(OptionKey::A),
            "B" => Some(OptionKey::B),
            "C" => Some(OptionKey::C),
            "D" => Some(OptionKey::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryQuestion {
    pub id: i64,
    pub game_code: String,
    pub category: String,
    pub points: u32,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: OptionKey,
    pub time_limit_sec: u32,
}

impl CategoryQuestion {
    pub fn option_text(&self, key: OptionKey) -> &str {
        match key {
            OptionKey::A => &self.option_a,
            OptionKey::B => &self.option_b,
            OptionKey::C => &self.option_c,
            OptionKey::D => &self.option_d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryTile {
    pub id: u32,
    pub category: String,
    pub points: u32,
    pub used: bool, // Terminal once set
    pub question: CategoryQuestion,
    pub solved_by_team_id: Option<TeamId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CategoryPhase {
    Board,
    Question,
    Steal,
    Reveal,
    Finished,
}

/// Outcome shown to the room before returning to the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RevealState {
    pub correct: OptionKey,
    pub chosen: Option<OptionKey>,
    pub was_correct: bool,
    pub points_awarded: u32,
    pub winner_team_id: Option<TeamId>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryState {
    pub topic: String,
    pub teams: Vec<Team>,
    pub tiles: Vec<CategoryTile>,
    pub phase: CategoryPhase,
    pub active_tile_id: Option<u32>,
    pub selected_team_id: Option<TeamId>,
    pub armed_team_id: Option<TeamId>,
    /// Teams that already answered the active tile, in answer order
    pub attempted_team_ids: Vec<TeamId>,
    pub reveal: Option<RevealState>,
}

impl CategoryState {
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn tile(&self, tile_id: u32) -> Option<&CategoryTile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    pub fn active_tile(&self) -> Option<&CategoryTile> {
        self.active_tile_id.and_then(|id| self.tile(id))
    }

    pub fn has_attempted(&self, team_id: &str) -> bool {
        self.attempted_team_ids.iter().any(|id| id == team_id)
    }

    /// Teams that may answer right now: everyone outside a steal,
    /// only the teams that have not tried yet during one
    pub fn selectable_teams(&self) -> Vec<&Team> {
        match self.phase {
            CategoryPhase::Steal => self
                .teams
                .iter()
                .filter(|t| !self.has_attempted(&t.id))
                .collect(),
            CategoryPhase::Board
            | CategoryPhase::Question
            | CategoryPhase::Reveal
            | CategoryPhase::Finished => self.teams.iter().collect(),
        }
    }

    /// Board columns: categories in order of first appearance
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for tile in &self.tiles {
            if !columns.contains(&tile.category.as_str()) {
                columns.push(&tile.category);
            }
        }
        columns
    }

    /// Look up the tile drawn in a category column at a point row
    pub fn tile_at(&self, category: &str, points: u32) -> Option<&CategoryTile> {
        self.tiles
            .iter()
            .find(|t| t.category == category && t.points == points)
    }

    pub fn used_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.used).count()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, CategoryPhase::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_key_parse() {
        assert_eq!(OptionKey::parse("b"), Some(OptionKey::B));
        assert_eq!(OptionKey::parse(" D "), Some(OptionKey::D));
        assert_eq!(OptionKey::parse("E"), None);
        assert_eq!(OptionKey::parse(""), None);
    }

    #[test]
    fn test_option_key_serializes_as_letter() {
        let json = serde_json::to_value(OptionKey::C).unwrap();
        assert_eq!(json, "C");
    }
}
