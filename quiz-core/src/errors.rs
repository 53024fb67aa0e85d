use quiz_types::{GameKind, Rejection};

/// Data integrity problems. A session cannot start (or continue) past one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("{game} board needs exactly {expected} tiles, found {found}")]
    TileCountMismatch {
        game: GameKind,
        expected: usize,
        found: usize,
    },
    #[error("question {index}: {field} is blank")]
    BlankField { index: usize, field: &'static str },
    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),
    #[error("question {index}: {points} points is above the {max} point limit")]
    PointsOutOfRange { index: usize, points: u32, max: u32 },
    #[error("category '{category}' has {points} points, which is not a board row")]
    UnexpectedPoints { category: String, points: u32 },
    #[error("category '{category}' has more than one {points}-point question")]
    DuplicateCell { category: String, points: u32 },
    #[error("too many categories: board has {max} columns, found {found}")]
    TooManyCategories { max: usize, found: usize },
    #[error("invalid option key '{0}', expected A/B/C/D")]
    InvalidOption(String),
    #[error("team count {count} outside allowed range {min}..={max}")]
    TeamCount { count: usize, min: usize, max: usize },
    #[error("duplicate team id: {0}")]
    DuplicateTeamId(String),
    #[error("team at position {0} has a blank id")]
    BlankTeamId(usize),
    #[error("no {game} puzzle for topic '{topic}'")]
    UnknownTopic { game: GameKind, topic: String },
    #[error("{game} topic '{topic}' appears more than once")]
    DuplicateTopic { game: GameKind, topic: String },
    #[error("invalid game state: {0}")]
    InvariantViolation(String),
}

/// Why a session did not accept an action
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("action rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Integrity(#[from] SetupError),
}

impl DispatchError {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            DispatchError::Rejected(reason) => Some(*reason),
            DispatchError::Integrity(_) => None,
        }
    }
}
