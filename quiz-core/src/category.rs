use quiz_types::{
    CategoryAction, CategoryPhase, CategoryState, OptionKey, Rejection, RevealState, Team,
    TeamId,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::SetupError;
use crate::game_events::GameEvent;
use crate::puzzle::CategoryPuzzle;
use crate::roster::validate_roster;
use crate::scoring::standings;
use crate::transition::{Transition, TurnEngine};

/// Pick, answer and steal rules for the Category board
#[derive(Debug, Clone, Default)]
pub struct CategoryEngine {
    config: EngineConfig,
}

impl CategoryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opening state: every tile unused, scores at zero, first team selected
    pub fn start(
        &self,
        puzzle: &CategoryPuzzle,
        teams: Vec<Team>,
    ) -> Result<CategoryState, SetupError> {
        let tiles = puzzle.tiles();
        let expected = self.config.category_tile_count();
        if tiles.len() != expected {
            return Err(SetupError::TileCountMismatch {
                game: quiz_types::GameKind::Category,
                expected,
                found: tiles.len(),
            });
        }
        validate_roster(&teams, &self.config)?;

        let teams: Vec<Team> = teams
            .into_iter()
            .map(|mut team| {
                team.score = 0;
                team
            })
            .collect();
        let selected_team_id = teams.first().map(|t| t.id.clone());
        info!(
            "Created category game '{}' with {} teams over {} columns",
            puzzle.topic(),
            teams.len(),
            puzzle.columns().len()
        );

        Ok(CategoryState {
            topic: puzzle.topic().to_string(),
            teams,
            tiles,
            phase: CategoryPhase::Board,
            active_tile_id: None,
            selected_team_id,
            armed_team_id: None,
            attempted_team_ids: Vec::new(),
            reveal: None,
        })
    }

    /// Choose the team whose turn it is on the board
    pub fn select_team(&self, state: &CategoryState, team_id: &str) -> Transition<CategoryState> {
        match state.phase {
            CategoryPhase::Board => {}
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
            CategoryPhase::Question | CategoryPhase::Steal | CategoryPhase::Reveal => {
                return Transition::rejected(state.clone(), Rejection::TurnInProgress);
            }
        }
        if state.team(team_id).is_none() {
            return Transition::rejected(state.clone(), Rejection::UnknownTeam);
        }

        let mut next = state.clone();
        next.selected_team_id = Some(team_id.to_string());
        Transition::applied(
            next,
            vec![GameEvent::TeamSelected {
                team_id: team_id.to_string(),
            }],
        )
    }

    /// Open a tile's question for the picking team
    pub fn pick_tile(
        &self,
        state: &CategoryState,
        tile_id: u32,
        team_id: &str,
    ) -> Transition<CategoryState> {
        match state.phase {
            CategoryPhase::Board => {}
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
            CategoryPhase::Question | CategoryPhase::Steal | CategoryPhase::Reveal => {
                return Transition::rejected(state.clone(), Rejection::TurnInProgress);
            }
        }
        let Some(tile) = state.tile(tile_id) else {
            return Transition::rejected(state.clone(), Rejection::UnknownTile);
        };
        if tile.used {
            return Transition::rejected(state.clone(), Rejection::TileUsed);
        }
        if state.team(team_id).is_none() {
            return Transition::rejected(state.clone(), Rejection::UnknownTeam);
        }

        let mut next = state.clone();
        next.phase = CategoryPhase::Question;
        next.active_tile_id = Some(tile_id);
        next.selected_team_id = Some(team_id.to_string());
        next.armed_team_id = None;
        next.attempted_team_ids = vec![team_id.to_string()];
        next.reveal = None;
        debug!(
            "Team {} picked {} for {}",
            team_id, tile.category, tile.points
        );

        Transition::applied(
            next,
            vec![GameEvent::TilePicked {
                tile_id,
                team_id: team_id.to_string(),
            }],
        )
    }

    /// Hand the steal to a team that has not answered this tile yet
    pub fn arm_team(&self, state: &CategoryState, team_id: &str) -> Transition<CategoryState> {
        match state.phase {
            CategoryPhase::Steal => {}
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
            CategoryPhase::Board
            | CategoryPhase::Question
            | CategoryPhase::Reveal => {
                return Transition::rejected(state.clone(), Rejection::WrongPhase);
            }
        }
        if state.team(team_id).is_none() {
            return Transition::rejected(state.clone(), Rejection::UnknownTeam);
        }
        if state.has_attempted(team_id) {
            return Transition::rejected(state.clone(), Rejection::AlreadyAttempted);
        }
        let Some(tile_id) = state.active_tile_id else {
            return Transition::rejected(state.clone(), Rejection::NoActiveTile);
        };

        let mut next = state.clone();
        next.armed_team_id = Some(team_id.to_string());
        Transition::applied(
            next,
            vec![GameEvent::TeamArmed {
                tile_id,
                team_id: team_id.to_string(),
            }],
        )
    }

    /// Mark the answering team's choice. A right answer wins the tile; a wrong
    /// one opens or continues the steal until every team has tried. Once every
    /// team has missed, the tile is spent and the reveal shows the answer, so a
    /// one-team game goes straight from a first miss to the reveal.
    pub fn submit_answer(
        &self,
        state: &CategoryState,
        option: OptionKey,
    ) -> Transition<CategoryState> {
        let answering: TeamId = match state.phase {
            CategoryPhase::Question => match &state.selected_team_id {
                Some(id) => id.clone(),
                None => return Transition::rejected(state.clone(), Rejection::UnknownTeam),
            },
            CategoryPhase::Steal => match &state.armed_team_id {
                Some(id) => id.clone(),
                None => return Transition::rejected(state.clone(), Rejection::NoArmedTeam),
            },
            CategoryPhase::Board => {
                return Transition::rejected(state.clone(), Rejection::NoActiveTile);
            }
            CategoryPhase::Reveal => {
                return Transition::rejected(state.clone(), Rejection::WrongPhase);
            }
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
        };
        let Some(tile) = state.active_tile() else {
            return Transition::rejected(state.clone(), Rejection::NoActiveTile);
        };
        let tile_id = tile.id;
        let points = tile.points;
        let correct = tile.question.correct_option;

        let mut next = state.clone();
        next.armed_team_id = None;

        if option == correct {
            let Some(team) = next.teams.iter_mut().find(|t| t.id == answering) else {
                return Transition::rejected(state.clone(), Rejection::UnknownTeam);
            };
            team.score = team.score.saturating_add(points);
            let message = format!("{} +{}", team.name, points);

            if let Some(tile) = next.tiles.iter_mut().find(|t| t.id == tile_id) {
                tile.used = true;
                tile.solved_by_team_id = Some(answering.clone());
            }
            next.phase = CategoryPhase::Reveal;
            next.reveal = Some(RevealState {
                correct,
                chosen: Some(option),
                was_correct: true,
                points_awarded: points,
                winner_team_id: Some(answering.clone()),
                message,
            });
            info!("Team {} solved tile {} for {} points", answering, tile_id, points);

            return Transition::applied(
                next,
                vec![GameEvent::TileSolved {
                    tile_id,
                    team_id: answering,
                    points,
                }],
            );
        }

        if !next.has_attempted(&answering) {
            next.attempted_team_ids.push(answering.clone());
        }

        if next.attempted_team_ids.len() >= next.teams.len() {
            if let Some(tile) = next.tiles.iter_mut().find(|t| t.id == tile_id) {
                tile.used = true;
            }
            next.phase = CategoryPhase::Reveal;
            next.reveal = Some(RevealState {
                correct,
                chosen: Some(option),
                was_correct: false,
                points_awarded: 0,
                winner_team_id: None,
                message: format!("No one got it. Correct answer: {correct}"),
            });
            info!("Tile {} exhausted after {} attempts", tile_id, next.attempted_team_ids.len());

            return Transition::applied(next, vec![GameEvent::TileExhausted { tile_id, correct }]);
        }

        let event = match state.phase {
            CategoryPhase::Question => {
                next.phase = CategoryPhase::Steal;
                debug!("Team {} missed tile {}, steal open", answering, tile_id);
                GameEvent::StealOpened {
                    tile_id,
                    missed_by: answering,
                }
            }
            _ => {
                let remaining = next.teams.len() - next.attempted_team_ids.len();
                debug!(
                    "Team {} missed the steal on tile {}, {} teams left",
                    answering, tile_id, remaining
                );
                GameEvent::StealMissed {
                    tile_id,
                    team_id: answering,
                    remaining,
                }
            }
        };

        Transition::applied(next, vec![event])
    }

    /// Leave the reveal and return to the board
    pub fn acknowledge_reveal(&self, state: &CategoryState) -> Transition<CategoryState> {
        match state.phase {
            CategoryPhase::Reveal => {}
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
            CategoryPhase::Board | CategoryPhase::Question | CategoryPhase::Steal => {
                return Transition::rejected(state.clone(), Rejection::WrongPhase);
            }
        }

        let tile_id = state.active_tile_id.unwrap_or_default();
        let next = back_to_board(state);
        Transition::applied(next, vec![GameEvent::RevealAcknowledged { tile_id }])
    }

    /// The question modal was closed. An unanswered tile stays unused and its
    /// attempts are forgotten.
    pub fn close_modal(&self, state: &CategoryState) -> Transition<CategoryState> {
        match state.phase {
            CategoryPhase::Question | CategoryPhase::Steal | CategoryPhase::Reveal => {}
            CategoryPhase::Board => {
                return Transition::rejected(state.clone(), Rejection::NoActiveTile);
            }
            CategoryPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
        }

        let tile_id = state.active_tile_id.unwrap_or_default();
        let next = back_to_board(state);
        debug!("Closed modal for tile {}", tile_id);
        Transition::applied(next, vec![GameEvent::ModalClosed { tile_id }])
    }

    pub fn end_game(&self, state: &CategoryState) -> Transition<CategoryState> {
        if state.is_finished() {
            return Transition::rejected(state.clone(), Rejection::GameFinished);
        }

        let mut next = back_to_board(state);
        next.phase = CategoryPhase::Finished;
        let standings = standings(&next.teams);
        info!(
            "Category game '{}' ended with {} of {} tiles used",
            next.topic,
            next.used_count(),
            next.tiles.len()
        );

        Transition::applied(next, vec![GameEvent::GameEnded { standings }])
    }
}

fn back_to_board(state: &CategoryState) -> CategoryState {
    let mut next = state.clone();
    next.phase = CategoryPhase::Board;
    next.active_tile_id = None;
    next.armed_team_id = None;
    next.attempted_team_ids.clear();
    next.reveal = None;
    next
}

impl TurnEngine for CategoryEngine {
    type State = CategoryState;
    type Action = CategoryAction;

    fn apply(&self, state: &CategoryState, action: CategoryAction) -> Transition<CategoryState> {
        match action {
            CategoryAction::SelectTeam { team_id } => self.select_team(state, &team_id),
            CategoryAction::PickTile { tile_id, team_id } => {
                self.pick_tile(state, tile_id, &team_id)
            }
            CategoryAction::ArmTeam { team_id } => self.arm_team(state, &team_id),
            CategoryAction::SubmitAnswer { option } => self.submit_answer(state, option),
            CategoryAction::AcknowledgeReveal => self.acknowledge_reveal(state),
            CategoryAction::CloseModal => self.close_modal(state),
            CategoryAction::EndGame => self.end_game(state),
        }
    }

    fn check_invariants(&self, state: &CategoryState) -> Result<(), SetupError> {
        check_category_invariants(state)
    }
}

/// Attempt sets stay within the roster and scores match the solved tiles
pub fn check_category_invariants(state: &CategoryState) -> Result<(), SetupError> {
    if state.attempted_team_ids.len() > state.teams.len() {
        return Err(SetupError::InvariantViolation(format!(
            "{} attempts recorded for {} teams",
            state.attempted_team_ids.len(),
            state.teams.len()
        )));
    }

    let mut seen = HashSet::new();
    for id in &state.attempted_team_ids {
        if !seen.insert(id.as_str()) {
            return Err(SetupError::InvariantViolation(format!(
                "team {id} attempted the tile twice"
            )));
        }
        if state.team(id).is_none() {
            return Err(SetupError::InvariantViolation(format!(
                "unknown team {id} in attempt set"
            )));
        }
    }

    if matches!(state.phase, CategoryPhase::Question | CategoryPhase::Steal) {
        match state.active_tile() {
            Some(tile) if tile.used => {
                warn!("Used tile {} is open for answers", tile.id);
                return Err(SetupError::InvariantViolation(format!(
                    "used tile {} is open for answers",
                    tile.id
                )));
            }
            Some(_) => {}
            None => {
                return Err(SetupError::InvariantViolation(
                    "question open without an active tile".to_string(),
                ));
            }
        }
    }

    let mut solved_points: HashMap<&str, u32> = HashMap::new();
    for tile in &state.tiles {
        if let Some(owner) = &tile.solved_by_team_id {
            if !tile.used {
                return Err(SetupError::InvariantViolation(format!(
                    "tile {} solved but not used",
                    tile.id
                )));
            }
            let total = solved_points.entry(owner.as_str()).or_default();
            *total = total.saturating_add(tile.points);
        }
    }
    for team in &state.teams {
        let expected = solved_points.get(team.id.as_str()).copied().unwrap_or(0);
        if team.score != expected {
            return Err(SetupError::InvariantViolation(format!(
                "team {} has score {} but solved {} points",
                team.id, team.score, expected
            )));
        }
    }
    Ok(())
}
