//! Shared session state and its lock
//!
//! `SessionState` is the single record both writers mutate. It is only ever
//! reachable through [`SharedSession::lock`], so every read and write of its
//! fields happens under one mutex. Display code never touches the state
//! directly; it copies a [`Snapshot`] out and renders from that.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::error::SessionError;
use crate::outcome_log::{LogRecord, Verdict};

/// Incorrect guesses allowed before the round is lost
pub const MAX_TRIES: u32 = 6;

/// Length of a round, in countdown steps
pub const ROUND_SECS: u32 = 30;

/// Terminal status of a session. Moves away from `Pending` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Pending
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending => f.write_str("in progress"),
            Outcome::Won => f.write_str("won"),
            Outcome::Lost => f.write_str("lost"),
        }
    }
}

/// Set of guessed letters `a`..=`z`, one bit per letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LetterSet(u32);

impl LetterSet {
    fn bit(letter: char) -> u32 {
        debug_assert!(letter.is_ascii_lowercase());
        1 << (letter as u32 - 'a' as u32)
    }

    pub fn contains(&self, letter: char) -> bool {
        letter.is_ascii_lowercase() && self.0 & Self::bit(letter) != 0
    }

    /// Adds `letter`; returns false if it was already present.
    pub fn insert(&mut self, letter: char) -> bool {
        let bit = Self::bit(letter);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Trims `text` and turns embedded line breaks and other control characters
/// into spaces, so the question always fits on one log line.
fn single_line(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Mutable game record guarded by [`SharedSession`]
#[derive(Debug)]
pub struct SessionState {
    question: String,
    answer: String,
    guessed: LetterSet,
    guess_order: String,
    incorrect_count: u32,
    max_tries: u32,
    time_remaining: u32,
    outcome: Outcome,
}

impl SessionState {
    /// Validates the answer and builds a fresh pending state.
    pub fn new(
        question: &str,
        answer: &str,
        max_tries: u32,
        round_secs: u32,
    ) -> Result<Self, SessionError> {
        let answer = answer.trim();
        if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(SessionError::InvalidAnswer {
                answer: answer.to_string(),
            });
        }

        Ok(Self {
            question: single_line(question),
            answer: answer.to_string(),
            guessed: LetterSet::default(),
            guess_order: String::new(),
            incorrect_count: 0,
            max_tries,
            time_remaining: round_secs,
            outcome: Outcome::Pending,
        })
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn ended(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// True once every letter of the answer has been guessed.
    pub fn is_complete(&self) -> bool {
        self.answer.chars().all(|c| self.guessed.contains(c))
    }

    pub(crate) fn answer_contains(&self, letter: char) -> bool {
        self.answer.contains(letter)
    }

    pub(crate) fn has_guessed(&self, letter: char) -> bool {
        self.guessed.contains(letter)
    }

    pub(crate) fn record_guess(&mut self, letter: char) {
        if self.guessed.insert(letter) {
            self.guess_order.push(letter);
        }
    }

    pub(crate) fn count_miss(&mut self) {
        self.incorrect_count = (self.incorrect_count + 1).min(self.max_tries);
    }

    /// One countdown step. No-op once the session has ended.
    pub(crate) fn tick(&mut self) {
        if self.ended() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    /// Commits the terminal state if still pending.
    ///
    /// Only the caller that observes the `Pending` edge gets a record back;
    /// every later call returns `None`.
    pub(crate) fn finish(&mut self, outcome: Outcome) -> Option<LogRecord> {
        let verdict = match outcome {
            Outcome::Pending => return None,
            Outcome::Won => Verdict::Win,
            Outcome::Lost => Verdict::Lose,
        };
        if self.ended() {
            return None;
        }
        self.outcome = outcome;

        Some(LogRecord {
            verdict,
            answer: self.answer.clone(),
            question: self.question.clone(),
        })
    }

    /// Countdown ran out: floor the clock and record a loss if nothing else ended the round.
    pub(crate) fn expire(&mut self) -> Option<LogRecord> {
        if self.ended() {
            return None;
        }
        self.time_remaining = 0;
        self.finish(Outcome::Lost)
    }

    /// Answer with unguessed letters masked, e.g. `c _ t`.
    pub fn display_word(&self) -> String {
        let mut out = String::with_capacity(self.answer.len() * 2);
        for (i, c) in self.answer.chars().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(if self.guessed.contains(c) { c } else { '_' });
        }
        out
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            question: self.question.clone(),
            display_word: self.display_word(),
            guessed_letters: self.guess_order.clone(),
            incorrect_count: self.incorrect_count,
            max_tries: self.max_tries,
            time_remaining: self.time_remaining,
            outcome: self.outcome,
            revealed_answer: self.ended().then(|| self.answer.clone()),
        }
    }
}

/// Plain copy of the session taken at one lock-release point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub question: String,
    pub display_word: String,
    /// Guessed letters in the order they were entered
    pub guessed_letters: String,
    pub incorrect_count: u32,
    pub max_tries: u32,
    pub time_remaining: u32,
    pub outcome: Outcome,
    /// The answer, once the round is over
    pub revealed_answer: Option<String>,
}

impl Snapshot {
    pub fn ended(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// The one lock around [`SessionState`]
#[derive(Debug)]
pub struct SharedSession {
    inner: Mutex<SessionState>,
}

impl SharedSession {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Acquire the session lock.
    ///
    /// # Panics
    /// A poisoned lock means a holder panicked mid-update and the state's
    /// invariants can no longer be trusted. That is treated as fatal.
    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .lock()
            .expect("session state lock poisoned by a panicking holder")
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
