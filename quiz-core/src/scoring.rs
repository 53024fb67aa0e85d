use quiz_types::{BingoTile, Standing, Team};

use crate::config::EngineConfig;

/// Bonus awarded for every row, column or diagonal held entirely by one team
pub const BONUS_POINTS_PER_LINE: u32 = 100;

/// Largest point value a single question may carry
pub const MAX_TILE_POINTS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Row(usize),
    Column(usize),
    Diagonal,
    AntiDiagonal,
}

impl LineKind {
    /// Short key the board uses to highlight a completed line
    pub fn key(&self) -> String {
        match self {
            LineKind::Row(r) => format!("r{r}"),
            LineKind::Column(c) => format!("c{c}"),
            LineKind::Diagonal => "d0".to_string(),
            LineKind::AntiDiagonal => "d1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub indices: Vec<usize>,
}

/// Every row, column and both diagonals of a square board, in that order
pub fn square_lines(side: usize) -> Vec<Line> {
    let mut lines = Vec::with_capacity(side * 2 + 2);
    if side == 0 {
        return lines;
    }

    for r in 0..side {
        lines.push(Line {
            kind: LineKind::Row(r),
            indices: (0..side).map(|c| r * side + c).collect(),
        });
    }
    for c in 0..side {
        lines.push(Line {
            kind: LineKind::Column(c),
            indices: (0..side).map(|r| r * side + c).collect(),
        });
    }
    if side > 1 {
        lines.push(Line {
            kind: LineKind::Diagonal,
            indices: (0..side).map(|i| i * side + i).collect(),
        });
        lines.push(Line {
            kind: LineKind::AntiDiagonal,
            indices: (0..side).map(|i| i * side + (side - 1 - i)).collect(),
        });
    }

    lines
}

/// Pure score computation over Bingo claim state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringEngine {
    side: usize,
    lines: Vec<Line>,
    bonus_per_line: u32,
}

impl ScoringEngine {
    pub fn new(side: usize, bonus_per_line: u32) -> Self {
        Self {
            side,
            lines: square_lines(side),
            bonus_per_line,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.bingo_side, config.bonus_points_per_line)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tile_count(&self) -> usize {
        self.side * self.side
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn bonus_per_line(&self) -> u32 {
        self.bonus_per_line
    }

    /// Sum of point values for every tile claimed by `team_id`, capped at `u32::MAX`
    pub fn compute_base_score(tiles: &[BingoTile], team_id: &str) -> u32 {
        tiles
            .iter()
            .filter(|tile| tile.is_claimed_by(team_id))
            .fold(0u32, |total, tile| total.saturating_add(tile.points()))
    }

    /// Lines whose every tile is claimed by `team_id`. A missing tile never counts as claimed.
    pub fn lines_completed_by(&self, tiles: &[BingoTile], team_id: &str) -> Vec<&Line> {
        self.lines
            .iter()
            .filter(|line| {
                !line.indices.is_empty()
                    && line
                        .indices
                        .iter()
                        .all(|&i| tiles.get(i).is_some_and(|tile| tile.is_claimed_by(team_id)))
            })
            .collect()
    }

    pub fn team_score(&self, tiles: &[BingoTile], team_id: &str) -> u32 {
        let bonus_lines = self.lines_completed_by(tiles, team_id).len() as u32;
        Self::compute_base_score(tiles, team_id)
            .saturating_add(bonus_lines.saturating_mul(self.bonus_per_line))
    }

    /// Fresh team list with every score derived from `tiles`; inputs are untouched
    pub fn recompute_all_scores(&self, teams: &[Team], tiles: &[BingoTile]) -> Vec<Team> {
        teams
            .iter()
            .map(|team| Team {
                score: self.team_score(tiles, &team.id),
                ..team.clone()
            })
            .collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Teams ordered by score, highest first. Ties keep roster order and share a rank.
pub fn standings(teams: &[Team]) -> Vec<Standing> {
    let mut sorted: Vec<Team> = teams.to_vec();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let mut result: Vec<Standing> = Vec::with_capacity(sorted.len());
    for (position, team) in sorted.into_iter().enumerate() {
        let rank = match result.last() {
            Some(prev) if prev.team.score == team.score => prev.rank,
            _ => position as u32 + 1,
        };
        result.push(Standing { rank, team });
    }
    result
}
