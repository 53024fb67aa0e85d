#![allow(dead_code)]

use quiz_core::{
    BingoEngine, BingoPuzzle, BingoSession, CategoryEngine, CategoryPuzzle, CategorySession,
    EngineConfig, GameEvent, GameEventHandler,
};
use quiz_types::{BingoQuestion, CategoryQuestion, MascotId, OptionKey, Team};
use std::sync::{Arc, Mutex};

/// Route engine logs to the test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Creates a test team with a readable id ("team-a" for "A")
pub fn create_test_team(name: &str) -> Team {
    Team {
        id: format!("team-{}", name.to_lowercase()),
        name: format!("Team {name}"),
        color: "#22c55e".to_string(),
        score: 0,
        mascot_id: MascotId::Shark,
    }
}

/// Creates the first `count` of teams A, B, C, D
pub fn create_test_teams(count: usize) -> Vec<Team> {
    ["A", "B", "C", "D"][..count]
        .iter()
        .map(|name| create_test_team(name))
        .collect()
}

/// Bingo question for a slot, worth `10 * (slot + 1)` points
pub fn create_bingo_question(slot: usize) -> BingoQuestion {
    BingoQuestion {
        id: format!("bq-{slot}"),
        game: "avm".to_string(),
        question: format!("Bingo question {slot}"),
        answer: format!("Answer {slot}"),
        points: 10 * (slot as u32 + 1),
        time_limit_sec: 20,
        category: "Mixed".to_string(),
    }
}

pub fn create_bingo_puzzle() -> BingoPuzzle {
    let questions = (0..16).map(create_bingo_question).collect();
    BingoPuzzle::new("avm", questions, &EngineConfig::default()).unwrap()
}

/// Category grid whose every correct answer is B
pub fn create_category_questions() -> Vec<CategoryQuestion> {
    let mut questions = Vec::new();
    for category in ["History", "Science", "Art", "Sport", "Music"] {
        for points in [10, 20, 30, 40] {
            questions.push(CategoryQuestion {
                id: questions.len() as i64 + 1,
                game_code: "mod2a".to_string(),
                category: category.to_string(),
                points,
                question: format!("{category} question for {points}"),
                option_a: "Alpha".to_string(),
                option_b: "Bravo".to_string(),
                option_c: "Charlie".to_string(),
                option_d: "Delta".to_string(),
                correct_option: OptionKey::B,
                time_limit_sec: 30,
            });
        }
    }
    questions
}

pub fn create_category_puzzle() -> CategoryPuzzle {
    CategoryPuzzle::new("mod2a", create_category_questions(), &EngineConfig::default()).unwrap()
}

pub fn create_bingo_session(team_count: usize) -> BingoSession {
    BingoSession::new(
        BingoEngine::default(),
        &create_bingo_puzzle(),
        create_test_teams(team_count),
    )
    .unwrap()
}

pub fn create_category_session(team_count: usize) -> CategorySession {
    CategorySession::new(
        CategoryEngine::default(),
        &create_category_puzzle(),
        create_test_teams(team_count),
    )
    .unwrap()
}

/// Drop, reveal and mark correct in one go
pub fn claim_tile(session: &mut BingoSession, tile_index: usize, team_id: &str) {
    session.drop_team_on_tile(tile_index, team_id).unwrap();
    session.reveal_finished().unwrap();
    session.answer_correct().unwrap();
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
