//! Store models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use crate::game::GuessRecord;
use crate::store::{StoreError, schema};

/// Catalog language of a word.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// Turkmen.
    Tm,
    /// English.
    En,
    /// Russian.
    Ru,
}

impl Language {
    /// Converts the language to the string stored in the database.
    pub fn to_db_string(&self) -> String {
        self.to_string()
    }

    /// Parses the language from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the string is not a known language code.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, StoreError> {
        s.parse()
            .map_err(|_| StoreError::new(format!("Invalid language: '{}'", s)))
    }
}

/// Catalog word database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::words)]
pub struct Word {
    id: String,
    word: String,
    length: i32,
    starting_letter: String,
    language: String,
}

impl Word {
    /// Parses the stored language string into a [`Language`].
    #[instrument(skip(self), fields(language = %self.language))]
    pub fn parse_language(&self) -> Result<Language, StoreError> {
        Language::from_db_string(self.language())
    }
}

/// Insertable word model for catalog inserts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::words)]
pub struct NewWord {
    id: String,
    word: String,
    length: i32,
    starting_letter: String,
    language: String,
}

/// Game session database model.
#[derive(
    Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize, PartialEq,
)]
#[diesel(table_name = schema::game_sessions)]
pub struct GameSession {
    id: String,
    current_round: i32,
    current_group_id: Option<String>,
    updated_at: NaiveDateTime,
}

/// Competing group (team) database model.
#[derive(
    Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize, PartialEq,
)]
#[diesel(table_name = schema::groups)]
pub struct Group {
    id: String,
    session_id: String,
    name: String,
    score: i32,
    turn_order: i32,
}

/// Raw `game_state` row; `guesses` stays JSON-encoded here and is decoded
/// into [`RoundState`] at the store boundary.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::game_state)]
pub(crate) struct GameStateRow {
    pub id: String,
    pub session_id: String,
    pub group_id: String,
    pub current_word: Option<String>,
    pub current_word_id: Option<String>,
    pub timer_active: bool,
    pub timer_started_at: Option<NaiveDateTime>,
    pub attempts_used: i32,
    pub guesses: String,
    pub updated_at: NaiveDateTime,
}

impl GameStateRow {
    /// Decodes the guesses column and lifts the row into the domain type.
    pub fn into_round_state(self) -> Result<RoundState, StoreError> {
        let guesses: Vec<GuessRecord> = serde_json::from_str(&self.guesses)?;
        Ok(RoundState {
            id: self.id,
            session_id: self.session_id,
            group_id: self.group_id,
            current_word: self.current_word,
            current_word_id: self.current_word_id,
            timer_active: self.timer_active,
            timer_started_at: self.timer_started_at,
            attempts_used: self.attempts_used,
            guesses,
            updated_at: self.updated_at,
        })
    }
}

/// Live per-group round state with decoded guesses.
///
/// On the wire `guesses` may arrive either as a structured array or as the
/// JSON-encoded string stored in the database; both forms deserialize.
#[derive(Debug, Clone, Getters, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    id: String,
    session_id: String,
    group_id: String,
    current_word: Option<String>,
    current_word_id: Option<String>,
    timer_active: bool,
    timer_started_at: Option<NaiveDateTime>,
    attempts_used: i32,
    #[serde(deserialize_with = "guesses_from_wire")]
    guesses: Vec<GuessRecord>,
    updated_at: NaiveDateTime,
}

fn guesses_from_wire<'de, D>(deserializer: D) -> Result<Vec<GuessRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Encoded(String),
        Parsed(Vec<GuessRecord>),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Encoded(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
        Wire::Parsed(v) => Ok(v),
    }
}

/// Consistent view of a whole session: the session row, its groups in turn
/// order, and the active group's round state (if a group is active).
#[derive(Debug, Clone, Getters, Serialize, Deserialize, new)]
pub struct GameSnapshot {
    session: GameSession,
    groups: Vec<Group>,
    round_state: Option<RoundState>,
}
