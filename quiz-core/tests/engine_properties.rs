mod common;

use common::*;
use proptest::prelude::*;
use quiz_core::{
    BingoEngine, CategoryEngine, EngineConfig, ScoringEngine, TurnEngine, square_lines,
};
use quiz_types::{BingoAction, BingoTile, CategoryAction, OptionKey};

fn any_option() -> impl Strategy<Value = OptionKey> {
    prop_oneof![Just(OptionKey::A), Just(OptionKey::B), Just(OptionKey::C), Just(OptionKey::D),]
}

fn any_team_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("team-a".to_string()),
        Just("team-b".to_string()),
        Just("team-c".to_string()),
        Just("team-d".to_string()),
    ]
}

/// Bingo actions without the full reset
fn any_play_action() -> impl Strategy<Value = BingoAction> {
    prop_oneof![
        (0usize..18, any_team_id())
            .prop_map(|(tile_index, team_id)| BingoAction::DropTeamOnTile { tile_index, team_id }),
        Just(BingoAction::RevealFinished),
        Just(BingoAction::AnswerWrong),
        Just(BingoAction::AnswerCorrect),
        Just(BingoAction::AnswerCorrect),
        Just(BingoAction::CancelQuestion),
    ]
}

fn any_category_action() -> impl Strategy<Value = CategoryAction> {
    prop_oneof![
        any_team_id().prop_map(|team_id| CategoryAction::SelectTeam { team_id }),
        (1u32..=21, any_team_id())
            .prop_map(|(tile_id, team_id)| CategoryAction::PickTile { tile_id, team_id }),
        any_team_id().prop_map(|team_id| CategoryAction::ArmTeam { team_id }),
        any_option().prop_map(|option| CategoryAction::SubmitAnswer { option }),
        any_option().prop_map(|option| CategoryAction::SubmitAnswer { option }),
        Just(CategoryAction::AcknowledgeReveal),
        Just(CategoryAction::CloseModal),
    ]
}

/// Board with each tile left open or claimed by one of four teams
fn any_claims() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0usize..4), 16)
}

fn board_from_claims(claims: &[Option<usize>]) -> Vec<BingoTile> {
    let teams = create_test_teams(4);
    create_bingo_puzzle()
        .tiles()
        .into_iter()
        .zip(claims)
        .map(|(mut tile, claim)| {
            tile.claimed_by_team_id = claim.map(|i| teams[i].id.clone());
            tile
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_claimed_tiles_never_reopen(actions in prop::collection::vec(any_play_action(), 1..60)) {
        let engine = BingoEngine::default();
        let mut state = engine.start(&create_bingo_puzzle(), create_test_teams(4)).unwrap();

        for action in actions {
            let next = engine.apply(&state, action).state;
            for (before, after) in state.tiles.iter().zip(&next.tiles) {
                if let Some(owner) = &before.claimed_by_team_id {
                    prop_assert_eq!(after.claimed_by_team_id.as_ref(), Some(owner));
                }
            }
            prop_assert!(engine.check_invariants(&next).is_ok());
            state = next;
        }
    }

    #[test]
    fn prop_used_tiles_never_reopen(actions in prop::collection::vec(any_category_action(), 1..80)) {
        let engine = CategoryEngine::default();
        let mut state = engine.start(&create_category_puzzle(), create_test_teams(3)).unwrap();

        for action in actions {
            let next = engine.apply(&state, action).state;
            for (before, after) in state.tiles.iter().zip(&next.tiles) {
                if before.used {
                    prop_assert!(after.used);
                    prop_assert_eq!(&after.solved_by_team_id, &before.solved_by_team_id);
                }
            }
            state = next;
        }
    }

    #[test]
    fn prop_attempt_set_stays_within_roster(
        team_count in 1usize..=4,
        actions in prop::collection::vec(any_category_action(), 1..80),
    ) {
        let engine = CategoryEngine::default();
        let mut state = engine
            .start(&create_category_puzzle(), create_test_teams(team_count))
            .unwrap();

        for action in actions {
            state = engine.apply(&state, action).state;
            prop_assert!(state.attempted_team_ids.len() <= state.teams.len());
            prop_assert!(engine.check_invariants(&state).is_ok());
        }
    }

    #[test]
    fn prop_recompute_is_idempotent(claims in any_claims()) {
        let scoring = ScoringEngine::default();
        let tiles = board_from_claims(&claims);
        let teams = create_test_teams(4);

        let once = scoring.recompute_all_scores(&teams, &tiles);
        let twice = scoring.recompute_all_scores(&once, &tiles);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_line_bonus_iff_line_owned(claims in any_claims()) {
        let scoring = ScoringEngine::default();
        let tiles = board_from_claims(&claims);

        for team in create_test_teams(4) {
            let completed: Vec<String> = scoring
                .lines_completed_by(&tiles, &team.id)
                .into_iter()
                .map(|line| line.kind.key())
                .collect();

            for line in square_lines(4) {
                let owned = line
                    .indices
                    .iter()
                    .all(|&i| tiles[i].claimed_by_team_id.as_deref() == Some(team.id.as_str()));
                prop_assert_eq!(owned, completed.contains(&line.kind.key()));
            }

            let base = ScoringEngine::compute_base_score(&tiles, &team.id);
            let bonus = completed.len() as u32 * scoring.bonus_per_line();
            prop_assert_eq!(scoring.team_score(&tiles, &team.id), base + bonus);
        }
    }
}

#[test]
fn test_larger_board_from_config() {
    let config = EngineConfig {
        bingo_side: 5,
        ..EngineConfig::default()
    };
    let scoring = ScoringEngine::from_config(&config);
    assert_eq!(scoring.tile_count(), 25);
    assert_eq!(scoring.lines().len(), 12);
}
