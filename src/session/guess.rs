//! Guess processing
//!
//! Validates one letter and applies it to the session under the lock. The
//! terminal transition, if any, is committed before the lock is released.

use std::fmt;

use super::state::{Outcome, SessionState};
use crate::outcome_log::LogRecord;

/// Why a guess was refused without touching the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not a single lowercase letter `a`..=`z`
    InvalidInput,
}

/// Result of one `apply_guess` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Accepted,
    AlreadyGuessed,
    Rejected(RejectReason),
    GameAlreadyEnded,
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessOutcome::Accepted => f.write_str("accepted"),
            GuessOutcome::AlreadyGuessed => f.write_str("already guessed"),
            GuessOutcome::Rejected(RejectReason::InvalidInput) => {
                f.write_str("type a lowercase letter (a-z)")
            }
            GuessOutcome::GameAlreadyEnded => f.write_str("the round is over"),
        }
    }
}

/// Applies `letter` to `state`. Caller holds the session lock.
///
/// Returns the guess result and, when this guess ended the round, the record
/// to hand to the outcome log.
pub(crate) fn apply(state: &mut SessionState, letter: char) -> (GuessOutcome, Option<LogRecord>) {
    if !letter.is_ascii_lowercase() {
        return (GuessOutcome::Rejected(RejectReason::InvalidInput), None);
    }
    if state.ended() {
        return (GuessOutcome::GameAlreadyEnded, None);
    }
    if state.has_guessed(letter) {
        return (GuessOutcome::AlreadyGuessed, None);
    }

    state.record_guess(letter);
    if !state.answer_contains(letter) {
        state.count_miss();
    }

    // Win is checked first; a completed word never counts as a loss.
    let finished = if state.is_complete() {
        state.finish(Outcome::Won)
    } else if state.incorrect_count() >= state.max_tries() {
        state.finish(Outcome::Lost)
    } else {
        None
    };

    (GuessOutcome::Accepted, finished)
}
