//! Game logic: guess evaluation, scoring rules, the round timer, and the
//! lifecycle engine that ties them to the store and the sync channel.

mod engine;
mod error;
pub mod evaluate;
pub mod rules;
pub mod timer;

pub use engine::{EngineDelays, GameEngine, GuessOutcome, TimeoutOutcome};
pub use error::GameError;
pub use evaluate::{GuessRecord, LetterResult, LetterStatus};
