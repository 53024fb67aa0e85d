use quiz_types::{MascotId, Team};
use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::errors::SetupError;

/// Team colors handed out in lobby order
pub const TEAM_COLORS: [&str; 8] = [
    "#ef4444", "#3b82f6", "#22c55e", "#f59e0b", "#a855f7", "#14b8a6", "#ec4899", "#64748b",
];

/// Build the lobby's teams. Missing or blank names become "Team N"; colors and
/// mascots cycle through their palettes unless a mascot was picked.
pub fn build_roster(
    count: usize,
    names: &[String],
    mascots: &[Option<MascotId>],
    config: &EngineConfig,
) -> Result<Vec<Team>, SetupError> {
    check_team_count(count, config)?;

    let teams = (0..count)
        .map(|i| {
            let name = names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Team {}", i + 1));
            let mascot = mascots
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(MascotId::ALL[i % MascotId::ALL.len()]);
            Team::new(name, TEAM_COLORS[i % TEAM_COLORS.len()], mascot)
        })
        .collect();

    Ok(teams)
}

/// Check a roster handed to an engine: size bounds and unique, non-blank ids
pub fn validate_roster(teams: &[Team], config: &EngineConfig) -> Result<(), SetupError> {
    check_team_count(teams.len(), config)?;

    let mut seen = HashSet::new();
    for (i, team) in teams.iter().enumerate() {
        if team.id.trim().is_empty() {
            return Err(SetupError::BlankTeamId(i));
        }
        if !seen.insert(team.id.as_str()) {
            return Err(SetupError::DuplicateTeamId(team.id.clone()));
        }
    }
    Ok(())
}

fn check_team_count(count: usize, config: &EngineConfig) -> Result<(), SetupError> {
    if count < config.min_teams || count > config.max_teams {
        return Err(SetupError::TeamCount {
            count,
            min: config.min_teams,
            max: config.max_teams,
        });
    }
    Ok(())
}
