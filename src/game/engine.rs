//! Round and game lifecycle orchestration.
//!
//! The engine is the single mutation authority for its store: every
//! read-modify-write runs under one async mutex, which serializes the
//! timeout-vs-submission race. Scheduled transitions (auto reset, timer
//! restart) re-check the current word identity before applying, so a manual
//! reset or a fresh assignment turns them into no-ops.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use super::error::GameError;
use super::{evaluate, rules, timer};
use crate::store::{GameSession, GameSnapshot, GameStore};
use crate::sync::{RelayMessage, SyncChannel};

/// Delays for the engine's scheduled transitions. Injectable so tests can
/// shrink them.
#[derive(Debug, Clone, Copy)]
pub struct EngineDelays {
    /// Display time before auto-reset after a correct guess.
    pub reset_after_win: Duration,
    /// Display time before auto-reset after guessing out the round.
    pub reset_after_fail: Duration,
    /// Pause before the timer restarts after a wrong guess or timeout.
    pub timer_restart: Duration,
}

impl Default for EngineDelays {
    fn default() -> Self {
        Self {
            reset_after_win: Duration::from_secs(6),
            reset_after_fail: Duration::from_secs(3),
            timer_restart: Duration::from_millis(800),
        }
    }
}

/// Result of a guess submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// No session, active group, or assigned word; nothing changed.
    Skipped,
    /// Correct guess; points were awarded and an auto-reset is scheduled.
    Correct {
        /// Points added to the active group's score.
        points: i32,
        /// Attempts used including this guess.
        attempts_used: i32,
    },
    /// Wrong guess was recorded.
    Wrong {
        /// Attempts used including this guess.
        attempts_used: i32,
        /// True when the attempt limit is now exhausted.
        exhausted: bool,
    },
}

/// Result of a timeout transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// The round moved on before the timeout landed; nothing changed.
    Skipped,
    /// A synthetic timeout attempt was recorded.
    Recorded {
        /// Attempts used including the timeout.
        attempts_used: i32,
        /// True when the attempt limit is now exhausted (word cleared).
        exhausted: bool,
    },
}

struct EngineInner {
    store: GameStore,
    sync: Arc<dyn SyncChannel>,
    delays: EngineDelays,
    // Single critical section for all read-modify-write paths.
    mutation: Mutex<()>,
    // Pause moments per (session, group); in-memory only, used by resume to
    // preserve the remaining time across the pause gap.
    paused_at: StdMutex<HashMap<(String, String), NaiveDateTime>>,
}

/// Orchestrates rounds over a [`GameStore`], pushing a notification through
/// the sync channel after every committed mutation.
#[derive(Clone)]
pub struct GameEngine {
    inner: Arc<EngineInner>,
}

impl GameEngine {
    /// Creates an engine with default transition delays.
    pub fn new(store: GameStore, sync: Arc<dyn SyncChannel>) -> Self {
        Self::with_delays(store, sync, EngineDelays::default())
    }

    /// Creates an engine with custom transition delays.
    pub fn with_delays(store: GameStore, sync: Arc<dyn SyncChannel>, delays: EngineDelays) -> Self {
        info!(?delays, "Creating game engine");
        Self {
            inner: Arc::new(EngineInner {
                store,
                sync,
                delays,
                mutation: Mutex::new(()),
                paused_at: StdMutex::new(HashMap::new()),
            }),
        }
    }

    /// The underlying store, for read-only surface queries.
    pub fn store(&self) -> &GameStore {
        &self.inner.store
    }

    /// Creates a session with one group per name and activates the first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for an empty group list, or a store
    /// error.
    #[instrument(skip(self, group_names), fields(groups = group_names.len()))]
    pub async fn create_game(&self, group_names: &[String]) -> Result<GameSnapshot, GameError> {
        if group_names.iter().all(|n| n.trim().is_empty()) {
            return Err(GameError::validation("At least one group name is required"));
        }
        let names: Vec<String> = group_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let _guard = self.inner.mutation.lock().await;
        let snapshot = self.inner.store.create_game(&names)?;
        self.inner.sync.notify(RelayMessage::full_state(&snapshot));
        info!(session_id = %snapshot.session().id(), "Game created");
        Ok(snapshot)
    }

    /// Assigns a catalog word to the active group's round. The word must
    /// match the current round's required length.
    ///
    /// Returns `false` (without mutating) when the session, active group, or
    /// word cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] on a round/length mismatch, or a
    /// store error.
    #[instrument(skip(self))]
    pub async fn assign_word(&self, session_id: &str, word_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((session, group_id)) = self.resolve_active(session_id)? else {
            return Ok(false);
        };
        let Some(word) = self.inner.store.word(word_id)? else {
            warn!(word_id, "Word not found, assignment skipped");
            return Ok(false);
        };

        let required = rules::word_length_for_round(*session.current_round());
        if word.word().chars().count() != required {
            return Err(GameError::validation(format!(
                "Round {} needs a {}-letter word, '{}' has {}",
                session.current_round(),
                required,
                word.word(),
                word.word().chars().count()
            )));
        }

        self.inner.store.assign_word(session_id, &group_id, &word)?;
        self.clear_pause_mark(session_id, &group_id);
        self.notify(session_id);
        Ok(true)
    }

    /// Starts the round timer from the full duration.
    ///
    /// No-op (`false`) when no word is assigned or no group is active.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn start_timer(&self, session_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(false);
        };
        let Some(state) = self.inner.store.round_state(session_id, &group_id)? else {
            warn!(session_id, group_id, "Round state missing");
            return Ok(false);
        };
        let Some(word_id) = state.current_word_id().clone() else {
            warn!(session_id, "Timer start without an assigned word skipped");
            return Ok(false);
        };

        let started_at = Utc::now().naive_utc();
        self.inner
            .store
            .set_timer_running(session_id, &group_id, started_at)?;
        self.clear_pause_mark(session_id, &group_id);
        self.notify(session_id);
        self.spawn_timer_watch(session_id.to_string(), group_id, word_id, started_at);
        Ok(true)
    }

    /// Pauses the running timer. The start timestamp is retained as the
    /// frozen reference point; the pause moment is remembered in-process so
    /// resume can preserve the remaining time.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn pause_timer(&self, session_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(false);
        };
        let Some(state) = self.inner.store.round_state(session_id, &group_id)? else {
            return Ok(false);
        };
        if !*state.timer_active() {
            debug!(session_id, "Pause with no running timer skipped");
            return Ok(false);
        }

        self.inner.store.set_timer_paused(session_id, &group_id)?;
        self.mark_paused(session_id, &group_id, Utc::now().naive_utc());
        self.notify(session_id);
        Ok(true)
    }

    /// Resumes a paused timer, preserving the remaining time observed at the
    /// pause. If the timer had already run out, the timeout transition fires
    /// instead and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn resume_timer(&self, session_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(false);
        };
        let Some(state) = self.inner.store.round_state(session_id, &group_id)? else {
            return Ok(false);
        };
        if *state.timer_active() {
            debug!(session_id, "Resume with timer already running skipped");
            return Ok(false);
        }
        let Some(started_at) = *state.timer_started_at() else {
            debug!(session_id, "Resume without a paused timer skipped");
            return Ok(false);
        };

        let now = Utc::now().naive_utc();
        // Unknown pause moment (e.g. process restart) falls back to the raw
        // start reference, which charges the pause gap against the clock.
        let paused_at = self
            .take_pause_mark(session_id, &group_id)
            .unwrap_or(started_at);

        match timer::resume_started_at(started_at, paused_at, now) {
            Some(new_started_at) => {
                let Some(word_id) = state.current_word_id().clone() else {
                    return Ok(false);
                };
                self.inner
                    .store
                    .set_timer_running(session_id, &group_id, new_started_at)?;
                self.notify(session_id);
                self.spawn_timer_watch(
                    session_id.to_string(),
                    group_id,
                    word_id,
                    new_started_at,
                );
                Ok(true)
            }
            None => {
                info!(session_id, "Resume found the timer expired, timing out");
                self.apply_timeout(session_id, &group_id).await?;
                Ok(false)
            }
        }
    }

    /// Submits a guess for the active group.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for an empty guess or a length
    /// mismatch (no state change in either case), or a store error.
    #[instrument(skip(self, guess))]
    pub async fn submit_guess(
        &self,
        session_id: &str,
        guess: &str,
    ) -> Result<GuessOutcome, GameError> {
        let trimmed = guess.trim();
        if trimmed.is_empty() {
            return Err(GameError::validation("Empty guess"));
        }

        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(GuessOutcome::Skipped);
        };
        let Some(state) = self.inner.store.round_state(session_id, &group_id)? else {
            return Ok(GuessOutcome::Skipped);
        };
        // The word stays visible during the fail display window; a guess
        // landing there must not push attempts past the limit.
        if *state.attempts_used() >= rules::GUESS_LIMIT {
            debug!(session_id, group_id, "Guess after attempt limit skipped");
            return Ok(GuessOutcome::Skipped);
        }
        let Some(target) = state.current_word().clone() else {
            warn!(session_id, "Guess with no assigned word skipped");
            return Ok(GuessOutcome::Skipped);
        };
        let Some(word_id) = state.current_word_id().clone() else {
            return Ok(GuessOutcome::Skipped);
        };

        let normalized = trimmed.to_uppercase();
        let target_len = target.chars().count();
        if normalized.chars().count() != target_len {
            return Err(GameError::validation(format!(
                "Guess must be {} letters",
                target_len
            )));
        }

        let results = evaluate::evaluate(&normalized, &target);
        let correct = evaluate::is_all_correct(&results);

        let mut guesses = state.guesses().clone();
        guesses.push(evaluate::GuessRecord::new(normalized, results));
        let attempts = state.attempts_used() + 1;

        self.inner
            .store
            .record_attempt(session_id, &group_id, &guesses, attempts)?;
        self.clear_pause_mark(session_id, &group_id);

        if correct {
            let points = rules::score_for_attempts(attempts - 1);
            self.inner.store.add_score(&group_id, points)?;
            info!(session_id, group_id, attempts, points, "Round won");
            self.notify(session_id);
            self.schedule_reset(
                session_id.to_string(),
                group_id,
                word_id,
                self.inner.delays.reset_after_win,
            );
            Ok(GuessOutcome::Correct {
                points,
                attempts_used: attempts,
            })
        } else if attempts >= rules::GUESS_LIMIT {
            info!(session_id, group_id, attempts, "Round failed, attempts exhausted");
            self.notify(session_id);
            self.schedule_reset(
                session_id.to_string(),
                group_id,
                word_id,
                self.inner.delays.reset_after_fail,
            );
            Ok(GuessOutcome::Wrong {
                attempts_used: attempts,
                exhausted: true,
            })
        } else {
            debug!(session_id, group_id, attempts, "Wrong guess recorded");
            self.notify(session_id);
            self.schedule_timer_restart(session_id.to_string(), group_id, word_id);
            Ok(GuessOutcome::Wrong {
                attempts_used: attempts,
                exhausted: false,
            })
        }
    }

    /// Records a timeout for the active group's current word.
    ///
    /// Guarded against the timeout-vs-submission race: a no-op unless the
    /// given word is still assigned and the timer is still running. A guess
    /// landing first deactivates the timer, so a late timeout is dropped.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn handle_timeout(
        &self,
        session_id: &str,
        expected_word_id: &str,
    ) -> Result<TimeoutOutcome, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(TimeoutOutcome::Skipped);
        };
        let Some(state) = self.inner.store.round_state(session_id, &group_id)? else {
            return Ok(TimeoutOutcome::Skipped);
        };
        if state.current_word_id().as_deref() != Some(expected_word_id) || !*state.timer_active() {
            debug!(session_id, "Stale timeout dropped");
            return Ok(TimeoutOutcome::Skipped);
        }
        self.apply_timeout(session_id, &group_id).await
    }

    /// Resets the active group's round to idle.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn reset_round(&self, session_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some((_, group_id)) = self.resolve_active(session_id)? else {
            return Ok(false);
        };
        self.inner.store.clear_round(session_id, &group_id)?;
        self.clear_pause_mark(session_id, &group_id);
        self.notify(session_id);
        Ok(true)
    }

    /// Advances the session to the next round, capped at round 3. Returns
    /// the new round number, or `None` when already at the cap (no-op).
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn advance_round(&self, session_id: &str) -> Result<Option<i32>, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some(session) = self.session_or_warn(session_id)? else {
            return Ok(None);
        };
        let round = *session.current_round();
        if round >= rules::MAX_ROUND {
            debug!(session_id, round, "Already at the final round");
            return Ok(None);
        }
        self.inner.store.set_round(session_id, round + 1)?;
        info!(session_id, round = round + 1, "Round advanced");
        self.notify(session_id);
        Ok(Some(round + 1))
    }

    /// Switches which group's round state is live. The group must belong to
    /// the session; an unknown group is a warned no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn change_group(&self, session_id: &str, group_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        if self.session_or_warn(session_id)?.is_none() {
            return Ok(false);
        }
        let groups = self.inner.store.groups(session_id)?;
        if !groups.iter().any(|g| g.id() == group_id) {
            warn!(session_id, group_id, "Group does not belong to session");
            return Ok(false);
        }
        self.inner.store.set_current_group(session_id, group_id)?;
        self.notify(session_id);
        Ok(true)
    }

    /// Restarts the game: zeroes every group's score, returns to round 1,
    /// and resets the active round state. Destructive; surfaces should
    /// confirm with the admin before calling.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    #[instrument(skip(self))]
    pub async fn restart_game(&self, session_id: &str) -> Result<bool, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some(session) = self.session_or_warn(session_id)? else {
            return Ok(false);
        };
        self.inner.store.reset_scores(session_id)?;
        self.inner.store.set_round(session_id, 1)?;
        if let Some(group_id) = session.current_group_id() {
            self.inner.store.clear_round(session_id, group_id)?;
            self.clear_pause_mark(session_id, group_id);
        }
        info!(session_id, "Game restarted");
        self.notify(session_id);
        Ok(true)
    }

    /// Full session view for surfaces' initial load.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn snapshot(&self, session_id: &str) -> Result<Option<GameSnapshot>, GameError> {
        Ok(self.inner.store.snapshot(session_id)?)
    }

    // ───────────────────────── internals ─────────────────────────

    fn session_or_warn(&self, session_id: &str) -> Result<Option<GameSession>, GameError> {
        let session = self.inner.store.session(session_id)?;
        if session.is_none() {
            warn!(session_id, "Session not found, operation skipped");
        }
        Ok(session)
    }

    fn resolve_active(&self, session_id: &str) -> Result<Option<(GameSession, String)>, GameError> {
        let Some(session) = self.session_or_warn(session_id)? else {
            return Ok(None);
        };
        let Some(group_id) = session.current_group_id().clone() else {
            warn!(session_id, "No active group, operation skipped");
            return Ok(None);
        };
        Ok(Some((session, group_id)))
    }

    /// Core timeout transition; caller must hold the mutation lock.
    async fn apply_timeout(
        &self,
        session_id: &str,
        group_id: &str,
    ) -> Result<TimeoutOutcome, GameError> {
        let Some(state) = self.inner.store.round_state(session_id, group_id)? else {
            return Ok(TimeoutOutcome::Skipped);
        };
        let Some(target) = state.current_word().clone() else {
            debug!(session_id, "Timeout with no assigned word skipped");
            return Ok(TimeoutOutcome::Skipped);
        };
        let Some(word_id) = state.current_word_id().clone() else {
            return Ok(TimeoutOutcome::Skipped);
        };

        let mut guesses = state.guesses().clone();
        guesses.push(evaluate::timeout_record(target.chars().count()));
        let attempts = state.attempts_used() + 1;

        self.inner
            .store
            .record_attempt(session_id, group_id, &guesses, attempts)?;
        self.clear_pause_mark(session_id, group_id);

        if attempts >= rules::GUESS_LIMIT {
            // Timeout exhaustion clears the word at once; guess exhaustion
            // waits out the display delay instead. Kept as the product
            // behaves today.
            self.inner.store.clear_word(session_id, group_id)?;
            info!(session_id, group_id, attempts, "Round failed on timeout");
            self.notify(session_id);
            Ok(TimeoutOutcome::Recorded {
                attempts_used: attempts,
                exhausted: true,
            })
        } else {
            info!(session_id, group_id, attempts, "Timeout recorded");
            self.notify(session_id);
            self.schedule_timer_restart(session_id.to_string(), group_id.to_string(), word_id);
            Ok(TimeoutOutcome::Recorded {
                attempts_used: attempts,
                exhausted: false,
            })
        }
    }

    /// Timeout path for the polling watcher: applies only if the same word
    /// and the same timer run are still live.
    async fn timeout_if_current(
        &self,
        session_id: &str,
        group_id: &str,
        word_id: &str,
        started_at: NaiveDateTime,
    ) -> Result<TimeoutOutcome, GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some(state) = self.inner.store.round_state(session_id, group_id)? else {
            return Ok(TimeoutOutcome::Skipped);
        };
        let same_word = state.current_word_id().as_deref() == Some(word_id);
        let same_run = *state.timer_started_at() == Some(started_at);
        if !same_word || !same_run || !*state.timer_active() {
            debug!(session_id, group_id, "Stale timeout dropped");
            return Ok(TimeoutOutcome::Skipped);
        }
        self.apply_timeout(session_id, group_id).await
    }

    fn notify(&self, session_id: &str) {
        match self.inner.store.snapshot(session_id) {
            Ok(Some(snapshot)) => {
                self.inner.sync.notify(RelayMessage::full_state(&snapshot));
            }
            Ok(None) => warn!(session_id, "Notify skipped, session missing"),
            Err(e) => warn!(session_id, error = %e, "Notify skipped, snapshot failed"),
        }
    }

    fn schedule_reset(
        &self,
        session_id: String,
        group_id: String,
        word_id: String,
        delay: Duration,
    ) {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = engine
                .reset_if_current(&session_id, &group_id, &word_id)
                .await
            {
                warn!(session_id, error = %e, "Scheduled reset failed");
            }
        });
    }

    async fn reset_if_current(
        &self,
        session_id: &str,
        group_id: &str,
        word_id: &str,
    ) -> Result<(), GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some(state) = self.inner.store.round_state(session_id, group_id)? else {
            return Ok(());
        };
        if state.current_word_id().as_deref() != Some(word_id) {
            debug!(session_id, group_id, "Scheduled reset superseded, skipped");
            return Ok(());
        }
        self.inner.store.clear_round(session_id, group_id)?;
        self.clear_pause_mark(session_id, group_id);
        self.notify(session_id);
        Ok(())
    }

    fn schedule_timer_restart(&self, session_id: String, group_id: String, word_id: String) {
        let engine = self.clone();
        let delay = self.inner.delays.timer_restart;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = engine
                .restart_timer_if_current(&session_id, &group_id, &word_id)
                .await
            {
                warn!(session_id, error = %e, "Scheduled timer restart failed");
            }
        });
    }

    async fn restart_timer_if_current(
        &self,
        session_id: &str,
        group_id: &str,
        word_id: &str,
    ) -> Result<(), GameError> {
        let _guard = self.inner.mutation.lock().await;
        let Some(state) = self.inner.store.round_state(session_id, group_id)? else {
            return Ok(());
        };
        if state.current_word_id().as_deref() != Some(word_id) || *state.timer_active() {
            debug!(session_id, group_id, "Scheduled timer restart superseded, skipped");
            return Ok(());
        }
        let started_at = Utc::now().naive_utc();
        self.inner
            .store
            .set_timer_running(session_id, group_id, started_at)?;
        self.notify(session_id);
        self.spawn_timer_watch(
            session_id.to_string(),
            group_id.to_string(),
            word_id.to_string(),
            started_at,
        );
        Ok(())
    }

    /// Polls the running timer and fires the timeout transition exactly once
    /// when it expires. Exits as soon as the timer is deactivated, restarted,
    /// or the word changes.
    fn spawn_timer_watch(
        &self,
        session_id: String,
        group_id: String,
        word_id: String,
        started_at: NaiveDateTime,
    ) {
        let engine = self.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_millis(timer::POLL_INTERVAL_MS));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let state = match engine.inner.store.round_state(&session_id, &group_id) {
                    Ok(Some(state)) => state,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(session_id, error = %e, "Timer watch read failed");
                        break;
                    }
                };
                let same_word = state.current_word_id().as_deref() == Some(word_id.as_str());
                let same_run = *state.timer_started_at() == Some(started_at);
                if !same_word || !same_run || !*state.timer_active() {
                    break;
                }
                if timer::is_expired(Some(started_at), Utc::now().naive_utc()) {
                    if let Err(e) = engine
                        .timeout_if_current(&session_id, &group_id, &word_id, started_at)
                        .await
                    {
                        warn!(session_id, error = %e, "Timeout transition failed");
                    }
                    break;
                }
            }
        });
    }

    fn mark_paused(&self, session_id: &str, group_id: &str, at: NaiveDateTime) {
        self.inner
            .paused_at
            .lock()
            .unwrap()
            .insert((session_id.to_string(), group_id.to_string()), at);
    }

    fn take_pause_mark(&self, session_id: &str, group_id: &str) -> Option<NaiveDateTime> {
        self.inner
            .paused_at
            .lock()
            .unwrap()
            .remove(&(session_id.to_string(), group_id.to_string()))
    }

    fn clear_pause_mark(&self, session_id: &str, group_id: &str) {
        self.take_pause_mark(session_id, group_id);
    }
}
