//! Countdown arithmetic for the round timer.
//!
//! All functions are pure over an explicit `now`; the engine supplies the
//! wall clock and owns the polling task.

use chrono::{Duration, NaiveDateTime};

/// Fixed round duration in seconds.
pub const ROUND_DURATION_SECS: i64 = 30;

/// Fixed round duration in milliseconds.
pub const ROUND_DURATION_MS: i64 = ROUND_DURATION_SECS * 1000;

/// Polling interval for the countdown watcher.
pub const POLL_INTERVAL_MS: u64 = 250;

/// Milliseconds left on the timer, clamped to `[0, ROUND_DURATION_MS]`.
/// A missing start means the timer has not run: the full duration remains.
pub fn remaining_ms(started_at: Option<NaiveDateTime>, now: NaiveDateTime) -> i64 {
    match started_at {
        None => ROUND_DURATION_MS,
        Some(start) => {
            let elapsed = now.signed_duration_since(start).num_milliseconds();
            (ROUND_DURATION_MS - elapsed).clamp(0, ROUND_DURATION_MS)
        }
    }
}

/// Whole seconds left, rounded up — what the display shows.
pub fn remaining_secs(started_at: Option<NaiveDateTime>, now: NaiveDateTime) -> i64 {
    (remaining_ms(started_at, now) + 999) / 1000
}

/// True once a started timer has run out.
pub fn is_expired(started_at: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    started_at.is_some() && remaining_ms(started_at, now) == 0
}

/// Derives the synthetic start time for resuming a paused timer so that the
/// remaining time observed at `paused_at` is preserved at `now`.
///
/// Returns `None` when the timer had already run out by the pause point;
/// the caller must take the timeout transition instead of resuming.
pub fn resume_started_at(
    started_at: NaiveDateTime,
    paused_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let elapsed = paused_at.signed_duration_since(started_at);
    if elapsed.num_milliseconds() >= ROUND_DURATION_MS {
        return None;
    }
    Some(now - Duration::milliseconds(elapsed.num_milliseconds().max(0)))
}
