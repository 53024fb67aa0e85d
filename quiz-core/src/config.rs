use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

use crate::scoring::{BONUS_POINTS_PER_LINE, MAX_TILE_POINTS};

pub const DEFAULT_BINGO_SIDE: usize = 4;
pub const DEFAULT_CATEGORY_COLUMNS: usize = 5;
pub const DEFAULT_CATEGORY_POINT_ROWS: [u32; 4] = [10, 20, 30, 40];
pub const DEFAULT_MIN_TEAMS: usize = 1;
pub const DEFAULT_MAX_TEAMS: usize = 4;

/// Board geometry and scoring rules shared by both team games
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub bonus_points_per_line: u32,
    pub bingo_side: usize, // Bingo board is bingo_side x bingo_side
    pub category_columns: usize,
    pub category_point_rows: Vec<u32>,
    pub min_teams: usize,
    pub max_teams: usize,
}

impl EngineConfig {
    /// Read overrides from `QUIZ_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let category_point_rows = match lookup("QUIZ_CATEGORY_POINT_ROWS") {
            Some(raw) => parse_point_rows(&raw)
                .with_context(|| format!("Invalid QUIZ_CATEGORY_POINT_ROWS: {raw}"))?,
            None => defaults.category_point_rows,
        };

        let config = Self {
            bonus_points_per_line: parse_var(
                &lookup,
                "QUIZ_BONUS_POINTS_PER_LINE",
                defaults.bonus_points_per_line,
            )?,
            bingo_side: parse_var(&lookup, "QUIZ_BINGO_SIDE", defaults.bingo_side)?,
            category_columns: parse_var(
                &lookup,
                "QUIZ_CATEGORY_COLUMNS",
                defaults.category_columns,
            )?,
            category_point_rows,
            min_teams: parse_var(&lookup, "QUIZ_MIN_TEAMS", defaults.min_teams)?,
            max_teams: parse_var(&lookup, "QUIZ_MAX_TEAMS", defaults.max_teams)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bingo_side == 0 {
            bail!("Bingo board side must be at least 1");
        }
        if self.category_columns == 0 {
            bail!("Category board needs at least one column");
        }
        if self.category_point_rows.is_empty() {
            bail!("Category board needs at least one point row");
        }
        if let Some(points) = self.category_point_rows.iter().find(|&&p| p > MAX_TILE_POINTS) {
            bail!("Category point row {points} is above the {MAX_TILE_POINTS} point limit");
        }
        let mut rows = self.category_point_rows.clone();
        rows.sort_unstable();
        rows.dedup();
        if rows.len() != self.category_point_rows.len() {
            bail!("Category point rows must be distinct");
        }
        if self.min_teams == 0 || self.min_teams > self.max_teams {
            bail!(
                "Invalid team bounds: min {} max {}",
                self.min_teams,
                self.max_teams
            );
        }
        Ok(())
    }

    pub fn bingo_tile_count(&self) -> usize {
        self.bingo_side * self.bingo_side
    }

    pub fn category_tile_count(&self) -> usize {
        self.category_columns * self.category_point_rows.len()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bonus_points_per_line: BONUS_POINTS_PER_LINE,
            bingo_side: DEFAULT_BINGO_SIDE,
            category_columns: DEFAULT_CATEGORY_COLUMNS,
            category_point_rows: DEFAULT_CATEGORY_POINT_ROWS.to_vec(),
            min_teams: DEFAULT_MIN_TEAMS,
            max_teams: DEFAULT_MAX_TEAMS,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: {raw}")),
        None => Ok(default),
    }
}

fn parse_point_rows(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(|part| part.trim().parse::<u32>().map_err(anyhow::Error::from))
        .collect()
}
