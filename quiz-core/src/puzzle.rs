use anyhow::{Context, Result};
use quiz_types::{BingoQuestion, BingoTile, CategoryQuestion, CategoryTile, GameKind, OptionKey};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::errors::SetupError;
use crate::scoring::MAX_TILE_POINTS;

/// Normalize a topic code: "MOD 2A", "mod_2a" and "mod2a" all become "mod2a"
pub fn normalize_topic(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

fn require(value: &str, index: usize, field: &'static str) -> Result<(), SetupError> {
    if value.trim().is_empty() {
        return Err(SetupError::BlankField { index, field });
    }
    Ok(())
}

/// Validated Bingo question set. Question order is slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoPuzzle {
    topic: String,
    questions: Vec<BingoQuestion>,
}

impl BingoPuzzle {
    pub fn new(
        topic: &str,
        questions: Vec<BingoQuestion>,
        config: &EngineConfig,
    ) -> Result<Self, SetupError> {
        let expected = config.bingo_tile_count();
        if questions.len() != expected {
            return Err(SetupError::TileCountMismatch {
                game: GameKind::Bingo,
                expected,
                found: questions.len(),
            });
        }

        let mut seen_ids = HashSet::new();
        for (index, q) in questions.iter().enumerate() {
            require(&q.id, index, "id")?;
            require(&q.question, index, "question")?;
            require(&q.answer, index, "answer")?;
            require(&q.category, index, "category")?;
            if q.points > MAX_TILE_POINTS {
                return Err(SetupError::PointsOutOfRange {
                    index,
                    points: q.points,
                    max: MAX_TILE_POINTS,
                });
            }
            if !seen_ids.insert(q.id.as_str()) {
                return Err(SetupError::DuplicateQuestionId(q.id.clone()));
            }
        }

        Ok(Self {
            topic: normalize_topic(topic),
            questions,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[BingoQuestion] {
        &self.questions
    }

    /// Unclaimed tiles in slot order
    pub fn tiles(&self) -> Vec<BingoTile> {
        Self::lay_out(self.questions.clone())
    }

    /// Unclaimed tiles in a random order, the way the board is dealt for play
    pub fn shuffled_tiles<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<BingoTile> {
        let mut questions = self.questions.clone();
        questions.shuffle(rng);
        Self::lay_out(questions)
    }

    fn lay_out(questions: Vec<BingoQuestion>) -> Vec<BingoTile> {
        questions
            .into_iter()
            .enumerate()
            .map(|(idx, question)| BingoTile {
                id: format!("tile-{idx}"),
                question,
                claimed_by_team_id: None,
            })
            .collect()
    }
}

/// Validated Category question set: a full categories x point-rows grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPuzzle {
    topic: String,
    questions: Vec<CategoryQuestion>,
    columns: Vec<String>,
}

impl CategoryPuzzle {
    pub fn new(
        topic: &str,
        questions: Vec<CategoryQuestion>,
        config: &EngineConfig,
    ) -> Result<Self, SetupError> {
        let expected = config.category_tile_count();
        if questions.len() != expected {
            return Err(SetupError::TileCountMismatch {
                game: GameKind::Category,
                expected,
                found: questions.len(),
            });
        }

        let mut seen_ids = HashSet::new();
        let mut cells = HashSet::new();
        let mut columns: Vec<String> = Vec::new();

        for (index, q) in questions.iter().enumerate() {
            require(&q.category, index, "category")?;
            require(&q.question, index, "question")?;
            for key in OptionKey::ALL {
                let field = match key {
                    OptionKey::A => "option A",
                    OptionKey::B => "option B",
                    OptionKey::C => "option C",
                    OptionKey::D => "option D",
                };
                require(q.option_text(key), index, field)?;
            }

            if !seen_ids.insert(q.id) {
                return Err(SetupError::DuplicateQuestionId(q.id.to_string()));
            }
            if !config.category_point_rows.contains(&q.points) {
                return Err(SetupError::UnexpectedPoints {
                    category: q.category.clone(),
                    points: q.points,
                });
            }
            if !cells.insert((q.category.as_str(), q.points)) {
                return Err(SetupError::DuplicateCell {
                    category: q.category.clone(),
                    points: q.points,
                });
            }
            if !columns.contains(&q.category) {
                columns.push(q.category.clone());
            }
        }

        // With an exact count and unique cells, staying within the column
        // budget means every category fills every point row.
        if columns.len() > config.category_columns {
            return Err(SetupError::TooManyCategories {
                max: config.category_columns,
                found: columns.len(),
            });
        }

        Ok(Self {
            topic: normalize_topic(topic),
            questions,
            columns,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[CategoryQuestion] {
        &self.questions
    }

    /// Category names in board column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Unused tiles numbered from 1 in loader order
    pub fn tiles(&self) -> Vec<CategoryTile> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| CategoryTile {
                id: i as u32 + 1,
                category: q.category.clone(),
                points: q.points,
                used: false,
                question: q.clone(),
                solved_by_team_id: None,
            })
            .collect()
    }
}

/// The external question store, keyed by topic code
pub trait PuzzleSource {
    fn bingo_questions(&self, topic: &str) -> Result<Vec<BingoQuestion>>;
    fn category_questions(&self, topic: &str) -> Result<Vec<CategoryQuestion>>;
}

pub fn load_bingo_puzzle(
    source: &dyn PuzzleSource,
    topic: &str,
    config: &EngineConfig,
) -> Result<BingoPuzzle> {
    let questions = source
        .bingo_questions(topic)
        .with_context(|| format!("Failed to load bingo questions for '{topic}'"))?;
    let puzzle = BingoPuzzle::new(topic, questions, config)
        .with_context(|| format!("Bingo topic '{topic}' is not playable"))?;
    info!("Loaded bingo puzzle '{}' with {} questions", puzzle.topic(), puzzle.questions().len());
    Ok(puzzle)
}

pub fn load_category_puzzle(
    source: &dyn PuzzleSource,
    topic: &str,
    config: &EngineConfig,
) -> Result<CategoryPuzzle> {
    let questions = source
        .category_questions(topic)
        .with_context(|| format!("Failed to load category questions for '{topic}'"))?;
    let puzzle = CategoryPuzzle::new(topic, questions, config)
        .with_context(|| format!("Category topic '{topic}' is not playable"))?;
    info!(
        "Loaded category puzzle '{}' with {} categories",
        puzzle.topic(),
        puzzle.columns().len()
    );
    Ok(puzzle)
}

#[derive(Debug, Deserialize)]
struct BingoRow {
    id: String,
    #[serde(default)]
    slot: u32,
    question: String,
    answer: String,
    points: u32,
    #[serde(default = "default_time_limit")]
    time_limit_sec: u32,
    category: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: i64,
    category: String,
    points: u32,
    question: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_option: String,
    #[serde(default = "default_time_limit")]
    time_limit_sec: u32,
}

fn default_time_limit() -> u32 {
    30
}

/// Re-key topics by normalized code; two keys for the same code are an error
fn normalize_keys<T>(
    topics: HashMap<String, Vec<T>>,
    game: GameKind,
) -> Result<HashMap<String, Vec<T>>, SetupError> {
    let mut normalized = HashMap::with_capacity(topics.len());
    for (topic, rows) in topics {
        let code = normalize_topic(&topic);
        if normalized.insert(code.clone(), rows).is_some() {
            return Err(SetupError::DuplicateTopic { game, topic: code });
        }
    }
    Ok(normalized)
}

#[derive(Debug, Default, Deserialize)]
struct PuzzleDocument {
    #[serde(default)]
    bingo: HashMap<String, Vec<BingoRow>>,
    #[serde(default)]
    category: HashMap<String, Vec<CategoryRow>>,
}

/// Question store backed by a JSON export of the question tables:
/// `{"bingo": {"<topic>": [rows]}, "category": {"<topic>": [rows]}}`
#[derive(Debug, Default)]
pub struct JsonPuzzleSource {
    document: PuzzleDocument,
}

impl JsonPuzzleSource {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: PuzzleDocument =
            serde_json::from_str(json).context("Failed to parse puzzle document")?;

        // Topic keys are matched after normalization, like the lobby does
        let document = PuzzleDocument {
            bingo: normalize_keys(raw.bingo, GameKind::Bingo)?,
            category: normalize_keys(raw.category, GameKind::Category)?,
        };

        debug!(
            "Puzzle document has {} bingo and {} category topics",
            document.bingo.len(),
            document.category.len()
        );
        Ok(Self { document })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Normalized topic codes available for a game
    pub fn topics(&self, game: GameKind) -> Vec<String> {
        let mut topics: Vec<String> = match game {
            GameKind::Bingo => self.document.bingo.keys().cloned().collect(),
            GameKind::Category => self.document.category.keys().cloned().collect(),
        };
        topics.sort();
        topics
    }
}

impl PuzzleSource for JsonPuzzleSource {
    fn bingo_questions(&self, topic: &str) -> Result<Vec<BingoQuestion>> {
        let topic = normalize_topic(topic);
        let rows = self
            .document
            .bingo
            .get(&topic)
            .ok_or_else(|| SetupError::UnknownTopic {
                game: GameKind::Bingo,
                topic: topic.clone(),
            })?;

        let mut ordered: Vec<&BingoRow> = rows.iter().collect();
        ordered.sort_by_key(|row| row.slot);

        Ok(ordered
            .into_iter()
            .map(|row| BingoQuestion {
                id: row.id.clone(),
                game: topic.clone(),
                question: row.question.trim().to_string(),
                answer: row.answer.trim().to_string(),
                points: row.points,
                time_limit_sec: row.time_limit_sec,
                category: row.category.trim().to_string(),
            })
            .collect())
    }

    fn category_questions(&self, topic: &str) -> Result<Vec<CategoryQuestion>> {
        let topic = normalize_topic(topic);
        let rows = self
            .document
            .category
            .get(&topic)
            .ok_or_else(|| SetupError::UnknownTopic {
                game: GameKind::Category,
                topic: topic.clone(),
            })?;

        let mut questions = rows
            .iter()
            .map(|row| -> Result<CategoryQuestion, SetupError> {
                let correct_option = OptionKey::parse(&row.correct_option)
                    .ok_or_else(|| SetupError::InvalidOption(row.correct_option.clone()))?;
                Ok(CategoryQuestion {
                    id: row.id,
                    game_code: topic.clone(),
                    category: row.category.trim().to_string(),
                    points: row.points,
                    question: row.question.trim().to_string(),
                    option_a: row.option_a.trim().to_string(),
                    option_b: row.option_b.trim().to_string(),
                    option_c: row.option_c.trim().to_string(),
                    option_d: row.option_d.trim().to_string(),
                    correct_option,
                    time_limit_sec: row.time_limit_sec,
                })
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        // Same ordering as the question table query: by category, then points
        questions.sort_by(|a, b| a.category.cmp(&b.category).then(a.points.cmp(&b.points)));
        Ok(questions)
    }
}
