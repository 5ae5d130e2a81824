//! Per-letter guess evaluation.

use std::collections::HashMap;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Match status of a single letter in a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    /// Right letter in the right position.
    Correct,
    /// Letter occurs in the target, elsewhere.
    Present,
    /// Letter does not occur (or all its occurrences are consumed).
    Absent,
    /// Synthetic status for a timed-out attempt.
    Timeout,
}

/// One evaluated letter of a guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LetterResult {
    letter: String,
    status: LetterStatus,
}

/// One submitted or timed-out attempt with its per-letter evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GuessRecord {
    word: String,
    results: Vec<LetterResult>,
}

/// Evaluates a guess against a target word of the same length.
///
/// Two passes: exact matches first, consuming the target's letter counts,
/// then presence against the remaining counts. Consuming exact matches
/// before partial ones is what keeps duplicate letters honest — a letter
/// that appears fewer times in the target than in the guess must not be
/// marked present more times than it exists.
///
/// Length validation is the caller's job; this function evaluates whatever
/// positions the guess has.
pub fn evaluate(guess: &str, target: &str) -> Vec<LetterResult> {
    let guess_chars: Vec<char> = guess.chars().collect();
    let target_chars: Vec<char> = target.chars().collect();

    let mut counts: HashMap<char, i32> = HashMap::new();
    for c in &target_chars {
        *counts.entry(*c).or_insert(0) += 1;
    }

    // Pass 1: exact positions.
    let mut statuses: Vec<Option<LetterStatus>> = vec![None; guess_chars.len()];
    for (i, c) in guess_chars.iter().enumerate() {
        if target_chars.get(i) == Some(c) {
            statuses[i] = Some(LetterStatus::Correct);
            *counts.entry(*c).or_insert(0) -= 1;
        }
    }

    // Pass 2: presence against the remaining counts.
    guess_chars
        .iter()
        .zip(statuses)
        .map(|(c, status)| {
            let status = status.unwrap_or_else(|| {
                let remaining = counts.entry(*c).or_insert(0);
                if *remaining > 0 {
                    *remaining -= 1;
                    LetterStatus::Present
                } else {
                    LetterStatus::Absent
                }
            });
            LetterResult::new(c.to_string(), status)
        })
        .collect()
}

/// A guess wins iff it has at least one position and every position matched.
pub fn is_all_correct(results: &[LetterResult]) -> bool {
    !results.is_empty()
        && results
            .iter()
            .all(|r| *r.status() == LetterStatus::Correct)
}

/// Builds the synthetic record for a timed-out attempt: a blank-padded word
/// with every position marked timeout.
pub fn timeout_record(length: usize) -> GuessRecord {
    GuessRecord::new(
        " ".repeat(length),
        (0..length)
            .map(|_| LetterResult::new(String::new(), LetterStatus::Timeout))
            .collect(),
    )
}
