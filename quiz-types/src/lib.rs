pub mod actions;
pub mod bingo;
pub mod category;
pub mod errors;
pub mod game;
pub mod team;

// Re-export all types
pub use actions::*;
pub use bingo::*;
pub use category::*;
pub use errors::*;
pub use game::*;
pub use team::*;
