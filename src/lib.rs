pub mod config;
pub mod error;
pub mod logging;
pub mod outcome_log;
pub mod puzzle;
pub mod render;
pub mod session;

pub use outcome_log::{FileOutcomeLog, LogRecord, OutcomeSink, Verdict};
pub use puzzle::Puzzle;
pub use session::{GuessOutcome, Outcome, SessionHandle, SessionOptions, Snapshot};
