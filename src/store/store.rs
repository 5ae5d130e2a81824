//! Embedded relational store for the word catalog and live game state.
//!
//! One [`GameStore`] owns a single SQLite connection behind a mutex, so every
//! mutation commits as one statement (or one transaction) and readers never
//! observe a half-applied update. Tests open a fresh store per case.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::game::GuessRecord;
use crate::store::models::GameStateRow;
use crate::store::{
    GameSession, GameSnapshot, Group, Language, NewWord, RoundState, StoreError, Word, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Starter catalog loaded by `word_tree seed` into a fresh database.
pub const STARTER_WORDS: &[(&str, Language)] = &[
    ("ABAT", Language::Tm),
    ("BABA", Language::Tm),
    ("ÇAGA", Language::Tm),
    ("TREE", Language::En),
    ("GAME", Language::En),
    ("STONE", Language::En),
    ("HOUSE", Language::En),
    ("ВАЗА", Language::Ru),
    ("ПОЛКА", Language::Ru),
    ("ЧАШКА", Language::Ru),
    ("ЛОЖКА", Language::Ru),
    ("ВИЛКА", Language::Ru),
    ("ПОРОГ", Language::Ru),
];

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Store handle for word catalog and session/group/round-state operations.
///
/// Cheap to clone; clones share the same underlying connection.
#[derive(Clone)]
pub struct GameStore {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl GameStore {
    /// Opens (creating if needed) the database at the given path and applies
    /// pending migrations.
    ///
    /// Use [`GameStore::open_in_memory`] for an isolated throwaway store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the connection or migrations fail.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        info!(path = %db_path, "Opening game store");
        let mut conn = SqliteConnection::establish(db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an isolated in-memory store. Dropped with the last clone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the connection or migrations fail.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    // ───────────────────────── word catalog ─────────────────────────

    /// Adds a word to the catalog. The text is trimmed and uppercased, and
    /// length/starting letter are derived from the normalized form.
    ///
    /// Idempotent: an empty or already-present word is a silent no-op and
    /// returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self, text), fields(language = %language))]
    pub fn add_word(&self, text: &str, language: Language) -> Result<Option<Word>, StoreError> {
        let normalized = text.trim().to_uppercase();
        let Some(first) = normalized.chars().next() else {
            debug!("Empty word submission ignored");
            return Ok(None);
        };

        let new_word = NewWord::new(
            generate_id(),
            normalized.clone(),
            normalized.chars().count() as i32,
            first.to_string(),
            language.to_db_string(),
        );

        let mut conn = self.conn.lock().unwrap();
        let inserted = diesel::insert_into(schema::words::table)
            .values(&new_word)
            .on_conflict(schema::words::word)
            .do_nothing()
            .execute(&mut *conn)?;

        if inserted == 0 {
            debug!(word = %normalized, "Word already in catalog");
            return Ok(None);
        }

        let word = schema::words::table
            .filter(schema::words::word.eq(&normalized))
            .first::<Word>(&mut *conn)?;
        info!(word = %word.word(), length = word.length(), "Word added to catalog");
        Ok(Some(word))
    }

    /// Bulk idempotent insert; returns how many words were actually added.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn seed_words(&self, entries: &[(&str, Language)]) -> Result<usize, StoreError> {
        let mut added = 0;
        for (text, language) in entries {
            if self.add_word(text, *language)?.is_some() {
                added += 1;
            }
        }
        info!(added, "Starter words seeded");
        Ok(added)
    }

    /// Lists catalog words of exactly the given length, optionally filtered
    /// by starting letter (case-insensitive) and language, ordered
    /// lexicographically by word.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn words_by_filter(
        &self,
        length: i32,
        starting_letter: Option<&str>,
        language: Option<Language>,
    ) -> Result<Vec<Word>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let mut query = schema::words::table
            .filter(schema::words::length.eq(length))
            .into_boxed();

        if let Some(letter) = starting_letter {
            query = query.filter(schema::words::starting_letter.eq(letter.to_uppercase()));
        }
        if let Some(language) = language {
            query = query.filter(schema::words::language.eq(language.to_db_string()));
        }

        let words = query
            .order(schema::words::word.asc())
            .load::<Word>(&mut *conn)?;
        debug!(count = words.len(), "Words loaded by filter");
        Ok(words)
    }

    /// Gets a catalog word by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn word(&self, id: &str) -> Result<Option<Word>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let word = schema::words::table
            .find(id)
            .first::<Word>(&mut *conn)
            .optional()?;
        Ok(word)
    }

    // ───────────────────── session / groups / state ─────────────────────

    /// Creates a session with one group and one empty round state per name,
    /// all in a single transaction, and activates the first group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `group_names` is empty or a database error
    /// occurs (in which case nothing is committed).
    #[instrument(skip(self, group_names), fields(groups = group_names.len()))]
    pub fn create_game(&self, group_names: &[String]) -> Result<GameSnapshot, StoreError> {
        if group_names.is_empty() {
            return Err(StoreError::new("A game needs at least one group"));
        }

        let session_id = generate_id();
        let ts = now();
        let mut conn = self.conn.lock().unwrap();

        conn.transaction::<(), StoreError, _>(|conn| {
            diesel::insert_into(schema::game_sessions::table)
                .values((
                    schema::game_sessions::id.eq(&session_id),
                    schema::game_sessions::current_round.eq(1),
                    schema::game_sessions::updated_at.eq(ts),
                ))
                .execute(conn)?;

            let mut first_group_id = None;
            for (i, name) in group_names.iter().enumerate() {
                let group_id = generate_id();
                diesel::insert_into(schema::groups::table)
                    .values((
                        schema::groups::id.eq(&group_id),
                        schema::groups::session_id.eq(&session_id),
                        schema::groups::name.eq(name),
                        schema::groups::score.eq(0),
                        schema::groups::turn_order.eq(i as i32 + 1),
                    ))
                    .execute(conn)?;

                diesel::insert_into(schema::game_state::table)
                    .values((
                        schema::game_state::id.eq(generate_id()),
                        schema::game_state::session_id.eq(&session_id),
                        schema::game_state::group_id.eq(&group_id),
                        schema::game_state::guesses.eq("[]"),
                        schema::game_state::attempts_used.eq(0),
                        schema::game_state::timer_active.eq(false),
                        schema::game_state::updated_at.eq(ts),
                    ))
                    .execute(conn)?;

                first_group_id.get_or_insert(group_id);
            }

            diesel::update(schema::game_sessions::table.find(&session_id))
                .set(schema::game_sessions::current_group_id.eq(first_group_id))
                .execute(conn)?;

            Ok(())
        })?;
        drop(conn);

        info!(session_id = %session_id, groups = group_names.len(), "Game created");
        self.snapshot(&session_id)?
            .ok_or_else(|| StoreError::new("Session vanished after creation"))
    }

    /// Gets a session by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn session(&self, session_id: &str) -> Result<Option<GameSession>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let session = schema::game_sessions::table
            .find(session_id)
            .first::<GameSession>(&mut *conn)
            .optional()?;
        Ok(session)
    }

    /// Lists the session's groups ordered by turn order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn groups(&self, session_id: &str) -> Result<Vec<Group>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let groups = schema::groups::table
            .filter(schema::groups::session_id.eq(session_id))
            .order(schema::groups::turn_order.asc())
            .load::<Group>(&mut *conn)?;
        Ok(groups)
    }

    /// Gets the round state for a (session, group) pair with decoded guesses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs or the stored
    /// guesses column is malformed.
    #[instrument(skip(self))]
    pub fn round_state(
        &self,
        session_id: &str,
        group_id: &str,
    ) -> Result<Option<RoundState>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let row = schema::game_state::table
            .filter(schema::game_state::session_id.eq(session_id))
            .filter(schema::game_state::group_id.eq(group_id))
            .first::<GameStateRow>(&mut *conn)
            .optional()?;
        row.map(GameStateRow::into_round_state).transpose()
    }

    /// Assembles the full session view: session, groups, and the active
    /// group's round state. Returns `None` for an unknown session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn snapshot(&self, session_id: &str) -> Result<Option<GameSnapshot>, StoreError> {
        let Some(session) = self.session(session_id)? else {
            return Ok(None);
        };
        let groups = self.groups(session_id)?;
        let round_state = match session.current_group_id() {
            Some(group_id) => self.round_state(session_id, group_id)?,
            None => None,
        };
        Ok(Some(GameSnapshot::new(session, groups, round_state)))
    }

    /// Reassigns the session's active group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_current_group(&self, session_id: &str, group_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(schema::game_sessions::table.find(session_id))
            .set((
                schema::game_sessions::current_group_id.eq(Some(group_id)),
                schema::game_sessions::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        debug!(session_id, group_id, "Active group changed");
        Ok(())
    }

    /// Sets the session's round number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_round(&self, session_id: &str, round: i32) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(schema::game_sessions::table.find(session_id))
            .set((
                schema::game_sessions::current_round.eq(round),
                schema::game_sessions::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }

    /// Adds points to a group's cumulative score.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn add_score(&self, group_id: &str, points: i32) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(schema::groups::table.find(group_id))
            .set(schema::groups::score.eq(schema::groups::score + points))
            .execute(&mut *conn)?;
        info!(group_id, points, "Score awarded");
        Ok(())
    }

    /// Zeroes the score of every group in the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn reset_scores(&self, session_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(schema::groups::table.filter(schema::groups::session_id.eq(session_id)))
            .set(schema::groups::score.eq(0))
            .execute(&mut *conn)?;
        warn!(session_id, "All group scores zeroed");
        Ok(())
    }

    /// Assigns a word to the round: sets the word fields, zeroes attempts,
    /// clears guesses, and deactivates the timer — one atomic update.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self, word), fields(word_id = %word.id()))]
    pub fn assign_word(
        &self,
        session_id: &str,
        group_id: &str,
        word: &Word,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::current_word.eq(Some(word.word().as_str())),
                schema::game_state::current_word_id.eq(Some(word.id().as_str())),
                schema::game_state::attempts_used.eq(0),
                schema::game_state::guesses.eq("[]"),
                schema::game_state::timer_active.eq(false),
                schema::game_state::timer_started_at.eq(None::<NaiveDateTime>),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        info!(session_id, group_id, "Word assigned");
        Ok(())
    }

    /// Activates the round timer with the given reference start time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_timer_running(
        &self,
        session_id: &str,
        group_id: &str,
        started_at: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::timer_active.eq(true),
                schema::game_state::timer_started_at.eq(Some(started_at)),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }

    /// Deactivates the timer, retaining `timer_started_at` as the frozen
    /// reference point.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn set_timer_paused(&self, session_id: &str, group_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::timer_active.eq(false),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }

    /// Records an attempt: replaces the guess list, bumps the attempt count,
    /// and deactivates the timer — one atomic update, so a reader never sees
    /// the guesses and the count disagree.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or a database error occurs.
    #[instrument(skip(self, guesses), fields(attempts_used))]
    pub fn record_attempt(
        &self,
        session_id: &str,
        group_id: &str,
        guesses: &[GuessRecord],
        attempts_used: i32,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(guesses)?;
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::guesses.eq(encoded),
                schema::game_state::attempts_used.eq(attempts_used),
                schema::game_state::timer_active.eq(false),
                schema::game_state::timer_started_at.eq(None::<NaiveDateTime>),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        info!(session_id, group_id, attempts_used, "Attempt recorded");
        Ok(())
    }

    /// Clears only the word fields and guesses, keeping the attempt count —
    /// the immediate clear used when a timeout exhausts the round.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear_word(&self, session_id: &str, group_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::current_word.eq(None::<String>),
                schema::game_state::current_word_id.eq(None::<String>),
                schema::game_state::guesses.eq("[]"),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }

    /// Resets the round to idle: no word, no guesses, no attempts, timer off.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear_round(&self, session_id: &str, group_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        diesel::update(state_row(session_id, group_id))
            .set((
                schema::game_state::current_word.eq(None::<String>),
                schema::game_state::current_word_id.eq(None::<String>),
                schema::game_state::attempts_used.eq(0),
                schema::game_state::guesses.eq("[]"),
                schema::game_state::timer_active.eq(false),
                schema::game_state::timer_started_at.eq(None::<NaiveDateTime>),
                schema::game_state::updated_at.eq(now()),
            ))
            .execute(&mut *conn)?;
        info!(session_id, group_id, "Round reset");
        Ok(())
    }
}

type StateRowFilter = diesel::helper_types::Filter<
    diesel::helper_types::Filter<
        schema::game_state::table,
        diesel::dsl::Eq<schema::game_state::session_id, String>,
    >,
    diesel::dsl::Eq<schema::game_state::group_id, String>,
>;

fn state_row(session_id: &str, group_id: &str) -> StateRowFilter {
    schema::game_state::table
        .filter(schema::game_state::session_id.eq(session_id.to_string()))
        .filter(schema::game_state::group_id.eq(group_id.to_string()))
}
