pub mod bingo;
pub mod category;
pub mod config;
pub mod errors;
pub mod game_events;
pub mod puzzle;
pub mod roster;
pub mod scoring;
pub mod session;
pub mod transition;

// Re-export main components
pub use bingo::*;
pub use category::*;
pub use config::*;
pub use errors::*;
pub use game_events::*;
pub use puzzle::*;
pub use roster::*;
pub use scoring::*;
pub use session::*;
pub use transition::*;
