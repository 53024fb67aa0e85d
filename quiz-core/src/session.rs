use quiz_types::{
    BingoAction, BingoState, CategoryAction, CategoryState, OptionKey, Rejection, Standing, Team,
};
use rand::Rng;
use tracing::{error, warn};

use crate::bingo::BingoEngine;
use crate::category::CategoryEngine;
use crate::errors::{DispatchError, SetupError};
use crate::game_events::{GameEvent, GameEventBus, GameEventHandler};
use crate::puzzle::{BingoPuzzle, CategoryPuzzle};
use crate::scoring::standings;
use crate::transition::{Outcome, TurnEngine};

/// Owns one game's state and feeds UI actions through its engine
pub struct Session<E: TurnEngine> {
    engine: E,
    state: E::State,
    event_bus: GameEventBus,
}

pub type BingoSession = Session<BingoEngine>;
pub type CategorySession = Session<CategoryEngine>;

impl<E: TurnEngine> Session<E> {
    pub fn from_state(engine: E, state: E::State) -> Self {
        Self {
            engine,
            state,
            event_bus: GameEventBus::new(),
        }
    }

    pub fn state(&self) -> &E::State {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    /// Apply one action. The state is replaced and events go to the handlers.
    /// A refused action comes back as its reason; an applied one that leaves
    /// the state inconsistent comes back as an integrity error, with no events
    /// published and the state left as the engine produced it.
    pub fn dispatch(&mut self, action: E::Action) -> Result<(), DispatchError> {
        let transition = self.engine.apply(&self.state, action);
        self.state = transition.state;

        match transition.outcome {
            Outcome::Applied(events) => {
                if let Err(e) = self.engine.check_invariants(&self.state) {
                    error!("Game state is inconsistent: {}", e);
                    return Err(e.into());
                }
                for event in events {
                    self.event_bus.publish(event);
                }
                Ok(())
            }
            Outcome::Rejected(reason) => {
                warn!("Action rejected: {}", reason);
                if matches!(reason, Rejection::AlreadyClaimed | Rejection::TileUsed) {
                    self.event_bus.publish(GameEvent::ClaimFailed { reason });
                }
                Err(reason.into())
            }
        }
    }
}

impl<E: TurnEngine> std::fmt::Debug for Session<E>
where
    E: std::fmt::Debug,
    E::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("state", &self.state)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

impl Session<BingoEngine> {
    pub fn new(engine: BingoEngine, puzzle: &BingoPuzzle, teams: Vec<Team>) -> Result<Self, SetupError> {
        let state = engine.start(puzzle, teams)?;
        Ok(Self::from_state(engine, state))
    }

    pub fn new_shuffled<R: Rng + ?Sized>(
        engine: BingoEngine,
        puzzle: &BingoPuzzle,
        teams: Vec<Team>,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let state = engine.start_shuffled(puzzle, teams, rng)?;
        Ok(Self::from_state(engine, state))
    }

    pub fn drop_team_on_tile(&mut self, tile_index: usize, team_id: &str) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::DropTeamOnTile {
            tile_index,
            team_id: team_id.to_string(),
        })
    }

    pub fn reveal_finished(&mut self) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::RevealFinished)
    }

    pub fn answer_wrong(&mut self) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::AnswerWrong)
    }

    pub fn answer_correct(&mut self) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::AnswerCorrect)
    }

    pub fn cancel_question(&mut self) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::CancelQuestion)
    }

    pub fn reset_claims_only(&mut self) -> Result<(), DispatchError> {
        self.dispatch(BingoAction::ResetClaimsOnly)
    }

    /// Finish the game and return the podium order
    pub fn end_game(&mut self) -> Result<Vec<Standing>, DispatchError> {
        self.dispatch(BingoAction::EndGame)?;
        Ok(self.standings())
    }

    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.state.teams)
    }

    pub fn bingo(&self) -> &BingoState {
        &self.state
    }
}

impl Session<CategoryEngine> {
    pub fn new(
        engine: CategoryEngine,
        puzzle: &CategoryPuzzle,
        teams: Vec<Team>,
    ) -> Result<Self, SetupError> {
        let state = engine.start(puzzle, teams)?;
        Ok(Self::from_state(engine, state))
    }

    pub fn select_team(&mut self, team_id: &str) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::SelectTeam {
            team_id: team_id.to_string(),
        })
    }

    pub fn pick_tile(&mut self, tile_id: u32, team_id: &str) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::PickTile {
            tile_id,
            team_id: team_id.to_string(),
        })
    }

    pub fn arm_team(&mut self, team_id: &str) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::ArmTeam {
            team_id: team_id.to_string(),
        })
    }

    pub fn submit_answer(&mut self, option: OptionKey) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::SubmitAnswer { option })
    }

    pub fn acknowledge_reveal(&mut self) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::AcknowledgeReveal)
    }

    pub fn close_modal(&mut self) -> Result<(), DispatchError> {
        self.dispatch(CategoryAction::CloseModal)
    }

    pub fn end_game(&mut self) -> Result<Vec<Standing>, DispatchError> {
        self.dispatch(CategoryAction::EndGame)?;
        Ok(self.standings())
    }

    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.state.teams)
    }

    pub fn category(&self) -> &CategoryState {
        &self.state
    }
}
