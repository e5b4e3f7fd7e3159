//! Round countdown task
//!
//! Decrements `time_remaining` once per tick for a fixed number of steps and
//! records a loss when the steps run out. Cancellation is cooperative: the
//! owner flips a `watch` flag, the task notices it at the next step boundary
//! and returns without writing an outcome. The lock is never held across the
//! sleep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::state::SharedSession;
use crate::outcome_log::OutcomeSink;

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    /// Stopped early: cancelled, or the round ended some other way
    Cancelled,
    /// Ran every step and committed the timeout loss
    Expired,
}

impl CountdownPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, CountdownPhase::Cancelled | CountdownPhase::Expired)
    }
}

pub struct Countdown {
    steps: u32,
    tick: Duration,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<CountdownPhase>>,
    finished: Option<CountdownPhase>,
}

impl Countdown {
    pub fn new(steps: u32, tick: Duration) -> Self {
        let (cancel, _rx) = watch::channel(false);
        Self {
            steps,
            tick,
            cancel,
            task: None,
            finished: None,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        if let Some(phase) = self.finished {
            return phase;
        }
        // A task that finished but was not joined yet still reads as running;
        // only the join knows which way it went.
        match &self.task {
            None => CountdownPhase::Idle,
            Some(_) => CountdownPhase::Running,
        }
    }

    /// Spawns the countdown on the current tokio runtime. `Idle → Running`.
    ///
    /// Calling it again while running is a no-op.
    pub fn start(&mut self, session: Arc<SharedSession>, sink: Arc<dyn OutcomeSink>) {
        if self.task.is_some() || self.finished.is_some() {
            return;
        }
        let cancel = self.cancel.subscribe();
        let steps = self.steps;
        let tick = self.tick;
        self.task = Some(tokio::spawn(async move {
            run(session, sink, cancel, steps, tick).await
        }));
    }

    /// Ask the task to stop at its next step boundary.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Cancel and wait for the task to terminate.
    ///
    /// Returns the terminal phase. A never-started countdown ends `Cancelled`.
    /// If the task panicked, the panic is resumed here.
    pub async fn stop(&mut self) -> CountdownPhase {
        self.cancel();
        self.join().await
    }

    /// Wait for the task to terminate on its own.
    pub async fn join(&mut self) -> CountdownPhase {
        if let Some(phase) = self.finished {
            return phase;
        }
        let phase = match self.task.take() {
            None => CountdownPhase::Cancelled,
            Some(task) => match task.await {
                Ok(phase) => phase,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => CountdownPhase::Cancelled,
            },
        };
        self.finished = Some(phase);
        phase
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        // Keeps an unjoined task from ticking a round nobody owns.
        self.cancel.send_replace(true);
    }
}

async fn run(
    session: Arc<SharedSession>,
    sink: Arc<dyn OutcomeSink>,
    mut cancel: watch::Receiver<bool>,
    steps: u32,
    tick: Duration,
) -> CountdownPhase {
    for step in 1..=steps {
        tokio::select! {
            biased;
            // A dropped sender counts as cancellation too.
            _ = cancel.wait_for(|cancelled| *cancelled) => {
                tracing::debug!(step, "countdown cancelled");
                return CountdownPhase::Cancelled;
            }
            _ = sleep(tick) => {}
        }

        // The last step commits the loss under the same lock, so no one can
        // observe a pending round with the clock at zero.
        let stepped = {
            let mut state = session.lock();
            if state.ended() {
                None
            } else {
                state.tick();
                let expired = if step == steps { state.expire() } else { None };
                Some((state.time_remaining(), expired))
            }
        };
        match stepped {
            Some((time_remaining, None)) => tracing::debug!(step, time_remaining, "tick"),
            Some((_, Some(record))) => {
                tracing::info!(answer = %record.answer, "round lost on time");
                sink.submit(record);
                return CountdownPhase::Expired;
            }
            None => {
                tracing::debug!(step, "round already over, countdown stopping");
                return CountdownPhase::Cancelled;
            }
        }
    }

    // Only reached for a zero-step round.
    let record = session.lock().expire();
    match record {
        Some(record) => {
            tracing::info!(answer = %record.answer, "round lost on time");
            sink.submit(record);
            CountdownPhase::Expired
        }
        None => CountdownPhase::Cancelled,
    }
}
