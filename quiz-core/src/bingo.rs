use quiz_types::{BingoAction, BingoPhase, BingoState, BingoTile, Rejection, Team};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::SetupError;
use crate::game_events::GameEvent;
use crate::puzzle::BingoPuzzle;
use crate::roster::validate_roster;
use crate::scoring::{ScoringEngine, standings};
use crate::transition::{Transition, TurnEngine};

/// Claim rules for the Bingo board. Every transition is pure: it reads the
/// current state and returns the next one.
#[derive(Debug, Clone)]
pub struct BingoEngine {
    config: EngineConfig,
    scoring: ScoringEngine,
}

impl BingoEngine {
    pub fn new(config: EngineConfig) -> Self {
        let scoring = ScoringEngine::from_config(&config);
        Self { config, scoring }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// Opening state with tiles in slot order
    pub fn start(&self, puzzle: &BingoPuzzle, teams: Vec<Team>) -> Result<BingoState, SetupError> {
        self.start_with_tiles(puzzle.topic(), puzzle.tiles(), teams)
    }

    /// Opening state with the board dealt in random order
    pub fn start_shuffled<R: Rng + ?Sized>(
        &self,
        puzzle: &BingoPuzzle,
        teams: Vec<Team>,
        rng: &mut R,
    ) -> Result<BingoState, SetupError> {
        self.start_with_tiles(puzzle.topic(), puzzle.shuffled_tiles(rng), teams)
    }

    fn start_with_tiles(
        &self,
        topic: &str,
        tiles: Vec<BingoTile>,
        teams: Vec<Team>,
    ) -> Result<BingoState, SetupError> {
        let expected = self.scoring.tile_count();
        if tiles.len() != expected {
            return Err(SetupError::TileCountMismatch {
                game: quiz_types::GameKind::Bingo,
                expected,
                found: tiles.len(),
            });
        }
        validate_roster(&teams, &self.config)?;

        let teams = self.scoring.recompute_all_scores(&teams, &tiles);
        let selected_team_id = teams.first().map(|t| t.id.clone());
        info!("Created bingo game '{}' with {} teams", topic, teams.len());

        Ok(BingoState {
            topic: topic.to_string(),
            teams,
            tiles,
            phase: BingoPhase::Idle,
            selected_team_id,
        })
    }

    /// A team chip was dropped on a tile. Opens the reveal for that team.
    pub fn drop_team_on_tile(
        &self,
        state: &BingoState,
        tile_index: usize,
        team_id: &str,
    ) -> Transition<BingoState> {
        if state.is_finished() {
            return Transition::rejected(state.clone(), Rejection::GameFinished);
        }
        let Some(tile) = state.tiles.get(tile_index) else {
            return Transition::rejected(state.clone(), Rejection::UnknownTile);
        };
        if tile.is_claimed() {
            return Transition::rejected(state.clone(), Rejection::AlreadyClaimed);
        }
        if state.team(team_id).is_none() {
            return Transition::rejected(state.clone(), Rejection::UnknownTeam);
        }

        match state.phase {
            BingoPhase::Idle => {
                let mut next = state.clone();
                next.selected_team_id = Some(team_id.to_string());
                next.phase = BingoPhase::PendingReveal { tile_index };
                debug!("Team {} targeted tile {}", team_id, tile_index);
                Transition::applied(
                    next,
                    vec![GameEvent::TileTargeted {
                        tile_index,
                        team_id: team_id.to_string(),
                    }],
                )
            }
            BingoPhase::PendingReveal { .. } | BingoPhase::Active { .. } => {
                Transition::rejected(state.clone(), Rejection::TurnInProgress)
            }
            BingoPhase::Finished => Transition::rejected(state.clone(), Rejection::GameFinished),
        }
    }

    /// The caller's reveal and countdown finished; the question opens
    pub fn reveal_finished(&self, state: &BingoState) -> Transition<BingoState> {
        match state.phase {
            BingoPhase::PendingReveal { tile_index } => {
                let team_id = state.selected_team_id.clone().unwrap_or_default();
                let mut next = state.clone();
                next.phase = BingoPhase::Active { tile_index };
                Transition::applied(next, vec![GameEvent::QuestionOpened { tile_index, team_id }])
            }
            BingoPhase::Idle => Transition::rejected(state.clone(), Rejection::NoActiveTile),
            BingoPhase::Active { .. } => Transition::rejected(state.clone(), Rejection::WrongPhase),
            BingoPhase::Finished => Transition::rejected(state.clone(), Rejection::GameFinished),
        }
    }

    /// Wrong answer: nothing is claimed and the tile stays open for any team
    pub fn answer_wrong(&self, state: &BingoState) -> Transition<BingoState> {
        match state.phase {
            BingoPhase::Active { tile_index } => {
                let team_id = state.selected_team_id.clone().unwrap_or_default();
                let mut next = state.clone();
                next.phase = BingoPhase::Idle;
                debug!("Team {} missed tile {}", team_id, tile_index);
                Transition::applied(next, vec![GameEvent::AnswerMissed { tile_index, team_id }])
            }
            BingoPhase::Idle | BingoPhase::PendingReveal { .. } => {
                Transition::rejected(state.clone(), Rejection::NoActiveTile)
            }
            BingoPhase::Finished => Transition::rejected(state.clone(), Rejection::GameFinished),
        }
    }

    /// Correct answer: lock the tile to the selected team and rescore the board
    pub fn answer_correct(&self, state: &BingoState) -> Transition<BingoState> {
        let tile_index = match state.phase {
            BingoPhase::Active { tile_index } => tile_index,
            BingoPhase::Idle | BingoPhase::PendingReveal { .. } => {
                return Transition::rejected(state.clone(), Rejection::NoActiveTile);
            }
            BingoPhase::Finished => {
                return Transition::rejected(state.clone(), Rejection::GameFinished);
            }
        };

        let team_id = match state.selected_team() {
            Some(team) => team.id.clone(),
            None => {
                warn!("Active tile {} has no valid answering team", tile_index);
                let mut next = state.clone();
                next.phase = BingoPhase::Idle;
                return Transition::rejected(next, Rejection::UnknownTeam);
            }
        };

        let claimed_by = state.tiles.get(tile_index).map(|t| t.claimed_by_team_id.clone());
        match claimed_by {
            Some(None) => {}
            Some(Some(owner)) => {
                // Single active tile should make this unreachable
                warn!(
                    "Tile {} was claimed by {} while open for {}",
                    tile_index, owner, team_id
                );
                let mut next = state.clone();
                next.phase = BingoPhase::Idle;
                return Transition::rejected(next, Rejection::AlreadyClaimed);
            }
            None => {
                warn!("Active tile index {} is off the board", tile_index);
                let mut next = state.clone();
                next.phase = BingoPhase::Idle;
                return Transition::rejected(next, Rejection::UnknownTile);
            }
        }

        let lines_before: HashSet<String> = self
            .scoring
            .lines_completed_by(&state.tiles, &team_id)
            .into_iter()
            .map(|line| line.kind.key())
            .collect();

        let mut next = state.clone();
        next.tiles[tile_index].claimed_by_team_id = Some(team_id.clone());
        next.teams = self.scoring.recompute_all_scores(&next.teams, &next.tiles);
        next.phase = BingoPhase::Idle;

        let new_lines: Vec<String> = self
            .scoring
            .lines_completed_by(&next.tiles, &team_id)
            .into_iter()
            .map(|line| line.kind.key())
            .filter(|key| !lines_before.contains(key))
            .collect();

        let points = next.tiles[tile_index].points();
        info!("Team {} claimed tile {} for {} points", team_id, tile_index, points);

        let mut events = vec![GameEvent::TileClaimed {
            tile_index,
            team_id: team_id.clone(),
            points,
        }];
        if !new_lines.is_empty() {
            info!("Team {} completed lines {:?}", team_id, new_lines);
            events.push(GameEvent::LineBonus {
                team_id,
                bonus: (new_lines.len() as u32).saturating_mul(self.scoring.bonus_per_line()),
                lines: new_lines,
            });
        }

        Transition::applied(next, events)
    }

    /// The question modal was closed before an answer was marked
    pub fn cancel_question(&self, state: &BingoState) -> Transition<BingoState> {
        match state.phase {
            BingoPhase::PendingReveal { tile_index } | BingoPhase::Active { tile_index } => {
                let mut next = state.clone();
                next.phase = BingoPhase::Idle;
                Transition::applied(next, vec![GameEvent::QuestionCancelled { tile_index }])
            }
            BingoPhase::Idle => Transition::rejected(state.clone(), Rejection::NoActiveTile),
            BingoPhase::Finished => Transition::rejected(state.clone(), Rejection::GameFinished),
        }
    }

    /// Clear every claim but keep the teams
    pub fn reset_claims_only(&self, state: &BingoState) -> Transition<BingoState> {
        if state.is_finished() {
            return Transition::rejected(state.clone(), Rejection::GameFinished);
        }

        let mut next = state.clone();
        for tile in &mut next.tiles {
            tile.claimed_by_team_id = None;
        }
        next.teams = self.scoring.recompute_all_scores(&next.teams, &next.tiles);
        next.phase = BingoPhase::Idle;
        info!("Bingo board '{}' reset", next.topic);

        Transition::applied(next, vec![GameEvent::BoardReset])
    }

    /// Freeze the board and hand the standings to the results screen
    pub fn end_game(&self, state: &BingoState) -> Transition<BingoState> {
        if state.is_finished() {
            return Transition::rejected(state.clone(), Rejection::GameFinished);
        }

        let mut next = state.clone();
        next.phase = BingoPhase::Finished;
        let standings = standings(&next.teams);
        info!(
            "Bingo game '{}' ended with {} of {} tiles claimed",
            next.topic,
            next.claimed_count(),
            next.tiles.len()
        );

        Transition::applied(next, vec![GameEvent::GameEnded { standings }])
    }
}

impl Default for BingoEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TurnEngine for BingoEngine {
    type State = BingoState;
    type Action = BingoAction;

    fn apply(&self, state: &BingoState, action: BingoAction) -> Transition<BingoState> {
        match action {
            BingoAction::DropTeamOnTile {
                tile_index,
                team_id,
            } => self.drop_team_on_tile(state, tile_index, &team_id),
            BingoAction::RevealFinished => self.reveal_finished(state),
            BingoAction::AnswerWrong => self.answer_wrong(state),
            BingoAction::AnswerCorrect => self.answer_correct(state),
            BingoAction::CancelQuestion => self.cancel_question(state),
            BingoAction::ResetClaimsOnly => self.reset_claims_only(state),
            BingoAction::EndGame => self.end_game(state),
        }
    }

    fn check_invariants(&self, state: &BingoState) -> Result<(), SetupError> {
        check_bingo_invariants(&self.scoring, state)
    }
}

/// Claims must point at known teams and scores must match the board
pub fn check_bingo_invariants(scoring: &ScoringEngine, state: &BingoState) -> Result<(), SetupError> {
    for (i, tile) in state.tiles.iter().enumerate() {
        if let Some(owner) = &tile.claimed_by_team_id {
            if state.team(owner).is_none() {
                return Err(SetupError::InvariantViolation(format!(
                    "tile {i} claimed by unknown team {owner}"
                )));
            }
        }
    }

    if let Some(i) = state.phase.tile_index() {
        match state.tiles.get(i) {
            Some(tile) if tile.is_claimed() => {
                return Err(SetupError::InvariantViolation(format!(
                    "claimed tile {i} is in play"
                )));
            }
            Some(_) => {}
            None => {
                return Err(SetupError::InvariantViolation(format!(
                    "tile {i} in play is off the board"
                )));
            }
        }
    }

    let expected = scoring.recompute_all_scores(&state.teams, &state.tiles);
    for (team, rescored) in state.teams.iter().zip(&expected) {
        if team.score != rescored.score {
            return Err(SetupError::InvariantViolation(format!(
                "team {} has score {} but the board gives {}",
                team.id, team.score, rescored.score
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::BONUS_POINTS_PER_LINE;
    use quiz_types::{BingoQuestion, MascotId};

    fn create_test_team(id: &str) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {}", id.to_uppercase()),
            color: "#ef4444".to_string(),
            score: 0,
            mascot_id: MascotId::Lion,
        }
    }

    fn create_test_puzzle() -> BingoPuzzle {
        let questions = (0..16)
            .map(|i| BingoQuestion {
                id: format!("q{i}"),
                game: "avm".to_string(),
                question: format!("Question {i}"),
                answer: format!("Answer {i}"),
                points: 10 + i as u32,
                time_limit_sec: 20,
                category: "General".to_string(),
            })
            .collect();
        BingoPuzzle::new("avm", questions, &EngineConfig::default()).unwrap()
    }

    fn create_test_game() -> (BingoEngine, BingoState) {
        let engine = BingoEngine::default();
        let teams = vec![create_test_team("a"), create_test_team("b")];
        let state = engine.start(&create_test_puzzle(), teams).unwrap();
        (engine, state)
    }

    fn claim(engine: &BingoEngine, state: BingoState, tile_index: usize, team_id: &str) -> BingoState {
        let state = engine.drop_team_on_tile(&state, tile_index, team_id).state;
        let state = engine.reveal_finished(&state).state;
        let t = engine.answer_correct(&state);
        assert!(t.is_applied(), "claim of {tile_index} failed: {:?}", t.outcome);
        t.state
    }

    #[test]
    fn test_start_validates_roster() {
        let engine = BingoEngine::default();
        let result = engine.start(&create_test_puzzle(), Vec::new());
        assert!(matches!(result, Err(SetupError::TeamCount { count: 0, .. })));

        let (_, state) = create_test_game();
        assert_eq!(state.phase, BingoPhase::Idle);
        assert_eq!(state.selected_team_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_start_rejects_mismatched_board() {
        let engine = BingoEngine::new(EngineConfig {
            bingo_side: 5,
            ..EngineConfig::default()
        });
        let result = engine.start(&create_test_puzzle(), vec![create_test_team("a")]);
        assert_eq!(
            result.unwrap_err(),
            SetupError::TileCountMismatch {
                game: quiz_types::GameKind::Bingo,
                expected: 25,
                found: 16
            }
        );
    }

    #[test]
    fn test_drop_reveal_answer_flow() {
        let (engine, state) = create_test_game();

        let t = engine.drop_team_on_tile(&state, 5, "b");
        assert_eq!(t.state.phase, BingoPhase::PendingReveal { tile_index: 5 });
        assert_eq!(t.state.selected_team_id.as_deref(), Some("b"));

        let t = engine.reveal_finished(&t.state);
        assert_eq!(t.state.phase, BingoPhase::Active { tile_index: 5 });
        assert_eq!(
            t.events(),
            &[GameEvent::QuestionOpened {
                tile_index: 5,
                team_id: "b".to_string()
            }]
        );

        let t = engine.answer_correct(&t.state);
        assert_eq!(t.state.phase, BingoPhase::Idle);
        assert_eq!(t.state.tiles[5].claimed_by_team_id.as_deref(), Some("b"));
        assert_eq!(t.state.team("b").unwrap().score, 15);
        assert_eq!(t.state.team("a").unwrap().score, 0);
    }

    #[test]
    fn test_only_one_turn_at_a_time() {
        let (engine, state) = create_test_game();
        let state = engine.drop_team_on_tile(&state, 0, "a").state;

        let t = engine.drop_team_on_tile(&state, 1, "b");
        assert_eq!(t.rejection(), Some(Rejection::TurnInProgress));
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_answer_wrong_leaves_tile_open() {
        let (engine, state) = create_test_game();
        let state = engine.drop_team_on_tile(&state, 3, "a").state;
        let state = engine.reveal_finished(&state).state;

        let t = engine.answer_wrong(&state);
        assert_eq!(t.state.phase, BingoPhase::Idle);
        assert!(!t.state.tiles[3].is_claimed());
        assert!(t.state.teams.iter().all(|team| team.score == 0));

        // Same team may try again
        let t = engine.drop_team_on_tile(&t.state, 3, "a");
        assert!(t.is_applied());
    }

    #[test]
    fn test_answer_requires_open_question() {
        let (engine, state) = create_test_game();

        assert_eq!(engine.answer_wrong(&state).rejection(), Some(Rejection::NoActiveTile));
        assert_eq!(engine.answer_correct(&state).rejection(), Some(Rejection::NoActiveTile));

        // Still revealing
        let state = engine.drop_team_on_tile(&state, 2, "a").state;
        assert_eq!(engine.answer_correct(&state).rejection(), Some(Rejection::NoActiveTile));

        let active = engine.reveal_finished(&state).state;
        assert_eq!(engine.reveal_finished(&active).rejection(), Some(Rejection::WrongPhase));
    }

    #[test]
    fn test_drop_rejections() {
        let (engine, state) = create_test_game();

        assert_eq!(
            engine.drop_team_on_tile(&state, 16, "a").rejection(),
            Some(Rejection::UnknownTile)
        );
        assert_eq!(
            engine.drop_team_on_tile(&state, 0, "zzz").rejection(),
            Some(Rejection::UnknownTeam)
        );

        let state = claim(&engine, state, 0, "a");
        let t = engine.drop_team_on_tile(&state, 0, "b");
        assert_eq!(t.rejection(), Some(Rejection::AlreadyClaimed));
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_correct_answer_on_claimed_tile_fails_and_closes() {
        let (engine, state) = create_test_game();
        let mut state = engine.drop_team_on_tile(&state, 4, "a").state;
        state = engine.reveal_finished(&state).state;
        // Simulate a claim that slipped in while the question was open
        state.tiles[4].claimed_by_team_id = Some("b".to_string());

        let t = engine.answer_correct(&state);
        assert_eq!(t.rejection(), Some(Rejection::AlreadyClaimed));
        assert_eq!(t.state.phase, BingoPhase::Idle);
        assert_eq!(t.state.tiles[4].claimed_by_team_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_line_bonus_event_only_for_new_lines() {
        let (engine, mut state) = create_test_game();
        for i in 0..3 {
            state = claim(&engine, state, i, "a");
        }

        let state = engine.drop_team_on_tile(&state, 3, "a").state;
        let state = engine.reveal_finished(&state).state;
        let t = engine.answer_correct(&state);

        assert_eq!(
            t.events()[1],
            GameEvent::LineBonus {
                team_id: "a".to_string(),
                lines: vec!["r0".to_string()],
                bonus: BONUS_POINTS_PER_LINE,
            }
        );
        assert_eq!(
            t.state.team("a").unwrap().score,
            10 + 11 + 12 + 13 + BONUS_POINTS_PER_LINE
        );

        // A claim that completes nothing new carries no bonus event
        let t2 = engine.drop_team_on_tile(&t.state, 7, "a");
        let t2 = engine.answer_correct(&engine.reveal_finished(&t2.state).state);
        assert_eq!(t2.events().len(), 1);
    }

    #[test]
    fn test_cancel_question() {
        let (engine, state) = create_test_game();
        assert_eq!(engine.cancel_question(&state).rejection(), Some(Rejection::NoActiveTile));

        let pending = engine.drop_team_on_tile(&state, 9, "b").state;
        let t = engine.cancel_question(&pending);
        assert_eq!(t.state.phase, BingoPhase::Idle);
        assert_eq!(t.events(), &[GameEvent::QuestionCancelled { tile_index: 9 }]);
        assert!(!t.state.tiles[9].is_claimed());
    }

    #[test]
    fn test_end_game_freezes_board() {
        let (engine, state) = create_test_game();
        let state = claim(&engine, state, 0, "b");

        let t = engine.end_game(&state);
        assert!(t.state.is_finished());
        match &t.events()[0] {
            GameEvent::GameEnded { standings } => {
                assert_eq!(standings[0].team.id, "b");
                assert_eq!(standings[1].team.id, "a");
            }
            other => panic!("unexpected event {other:?}"),
        }

        let finished = t.state;
        assert_eq!(
            engine.drop_team_on_tile(&finished, 1, "a").rejection(),
            Some(Rejection::GameFinished)
        );
        assert_eq!(engine.reset_claims_only(&finished).rejection(), Some(Rejection::GameFinished));
        assert_eq!(engine.end_game(&finished).rejection(), Some(Rejection::GameFinished));
    }

    #[test]
    fn test_invariant_check_catches_score_drift() {
        let (engine, state) = create_test_game();
        let mut state = claim(&engine, state, 2, "a");
        assert!(engine.check_invariants(&state).is_ok());

        state.teams[0].score += 5;
        assert!(matches!(
            engine.check_invariants(&state),
            Err(SetupError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_claims_on_oversized_tiles_do_not_panic() {
        let (engine, mut state) = create_test_game();
        for tile in &mut state.tiles {
            tile.question.points = u32::MAX / 2 + 1;
        }

        let state = claim(&engine, state, 0, "a");
        let state = claim(&engine, state, 1, "a");
        assert_eq!(state.team("a").unwrap().score, u32::MAX);
        assert!(engine.check_invariants(&state).is_ok());
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let (engine, state) = create_test_game();

        let t = engine.apply(
            &state,
            BingoAction::DropTeamOnTile {
                tile_index: 1,
                team_id: "a".to_string(),
            },
        );
        let t = engine.apply(&t.state, BingoAction::RevealFinished);
        let t = engine.apply(&t.state, BingoAction::AnswerCorrect);
        assert_eq!(t.state.claimed_count(), 1);

        let t = engine.apply(&t.state, BingoAction::ResetClaimsOnly);
        assert_eq!(t.state.claimed_count(), 0);
        assert_eq!(t.events(), &[GameEvent::BoardReset]);
    }
}
