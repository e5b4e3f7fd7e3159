//! Game session: shared state, countdown, guesses
//!
//! A [`SessionHandle`] owns the locked [`SessionState`], the countdown task
//! and the outcome sink. Two writers touch the state: `apply_guess` on the
//! caller's side and the countdown task. Whichever of them commits the
//! terminal outcome first submits the log record; the other sees `ended`
//! and does nothing.

mod countdown;
mod guess;
mod state;


use std::sync::Arc;
use std::time::Duration;

use crate::error::SessionError;
use crate::outcome_log::OutcomeSink;

pub use countdown::{Countdown, CountdownPhase};
pub use guess::{GuessOutcome, RejectReason};
pub use state::{LetterSet, MAX_TRIES, Outcome, ROUND_SECS, SessionState, SharedSession, Snapshot};

/// Round parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_tries: u32,
    /// Countdown steps; also the starting `time_remaining`
    pub round_secs: u32,
    /// Duration of one countdown step
    pub tick: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_tries: MAX_TRIES,
            round_secs: ROUND_SECS,
            tick: Duration::from_secs(1),
        }
    }
}

pub struct SessionHandle {
    shared: Arc<SharedSession>,
    countdown: Countdown,
    sink: Arc<dyn OutcomeSink>,
}

impl SessionHandle {
    /// Starts a round with default options.
    ///
    /// The countdown is spawned immediately.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new(
        question: &str,
        answer: &str,
        sink: Arc<dyn OutcomeSink>,
    ) -> Result<Self, SessionError> {
        Self::with_options(question, answer, SessionOptions::default(), sink)
    }

    /// Starts a round with the given options.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn with_options(
        question: &str,
        answer: &str,
        options: SessionOptions,
        sink: Arc<dyn OutcomeSink>,
    ) -> Result<Self, SessionError> {
        let state = SessionState::new(question, answer, options.max_tries, options.round_secs)?;
        let shared = Arc::new(SharedSession::new(state));

        let mut countdown = Countdown::new(options.round_secs, options.tick);
        countdown.start(Arc::clone(&shared), Arc::clone(&sink));

        tracing::debug!(
            letters = answer.trim().len(),
            round_secs = options.round_secs,
            max_tries = options.max_tries,
            "session started"
        );

        Ok(Self {
            shared,
            countdown,
            sink,
        })
    }

    /// Consistent copy of the session for display.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot()
    }

    /// Applies one guessed letter.
    ///
    /// If this guess ends the round, the countdown is told to stop and the
    /// outcome is submitted once the lock has been released.
    pub fn apply_guess(&self, letter: char) -> GuessOutcome {
        let (outcome, finished) = {
            let mut state = self.shared.lock();
            guess::apply(&mut state, letter)
        };
        tracing::debug!(%letter, result = %outcome, "guess");

        if let Some(record) = finished {
            tracing::info!(verdict = %record.verdict, answer = %record.answer, "round over");
            self.countdown.cancel();
            self.sink.submit(record);
        }
        outcome
    }

    pub fn countdown_phase(&self) -> CountdownPhase {
        self.countdown.phase()
    }

    /// Stops the countdown and waits for it to exit.
    ///
    /// Returns the countdown's terminal phase and the final snapshot. Nothing
    /// writes to the session after this returns.
    pub async fn shutdown(mut self) -> (CountdownPhase, Snapshot) {
        let phase = self.countdown.stop().await;
        let snapshot = self.shared.snapshot();
        tracing::debug!(?phase, outcome = %snapshot.outcome, "session shut down");
        (phase, snapshot)
    }

    /// Waits for the countdown to finish on its own, without cancelling it.
    pub async fn wait_for_countdown(&mut self) -> CountdownPhase {
        self.countdown.join().await
    }
}
