//! Persistence layer: word catalog, sessions, groups, and round state.

mod error;
mod models;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::StoreError;
pub use models::{GameSession, GameSnapshot, Group, Language, NewWord, RoundState, Word};
pub use store::{GameStore, STARTER_WORDS};
