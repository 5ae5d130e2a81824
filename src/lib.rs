//! Word Tree - multiplayer word guessing party game.
//!
//! Teams take turns guessing a hidden word against a 30-second countdown,
//! Wordle-style per-letter feedback, six attempts per round, three rounds of
//! increasing word length. This crate provides the word catalog and session
//! store (SQLite via diesel), the pure guess evaluator and scoring rules,
//! the round lifecycle engine, and a realtime sync channel over a dumb
//! websocket relay.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
pub mod game;
mod relay;
pub mod store;
mod sync;

pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError};
pub use game::{
    EngineDelays, GameEngine, GameError, GuessOutcome, GuessRecord, LetterResult, LetterStatus,
    TimeoutOutcome,
};
pub use relay::{relay_router, run_relay};
pub use store::{
    GameSession, GameSnapshot, GameStore, Group, Language, NewWord, RoundState, STARTER_WORDS,
    StoreError, Word,
};
pub use sync::{
    FRAGMENT_BUFFER_LIMIT, InMemoryChannel, MAX_RECONNECT_ATTEMPTS, RECONNECT_BASE_DELAY_MS,
    RelayClient, RelayMessage, SyncChannel, backoff_delay,
};
