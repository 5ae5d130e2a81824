//! Gameplay constants and scoring.

/// Attempts allowed per round.
pub const GUESS_LIMIT: i32 = 6;

/// Last playable round.
pub const MAX_ROUND: i32 = 3;

/// Points for a first-attempt correct guess.
pub const STARTING_POINTS: i32 = 120;

/// Points deducted per failed attempt before the correct one.
pub const ATTEMPT_PENALTY: i32 = 20;

/// Points awarded for a correct guess after `attempts_before` failed
/// attempts: 120 on the first try, 20 less per retry, floored at 0.
pub fn score_for_attempts(attempts_before: i32) -> i32 {
    (STARTING_POINTS - attempts_before * ATTEMPT_PENALTY).max(0)
}

/// Required word length for a round: 4 letters in round 1, 5 afterwards.
pub fn word_length_for_round(round: i32) -> usize {
    if round <= 1 { 4 } else { 5 }
}
