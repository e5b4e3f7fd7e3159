//! Error types for session, puzzle, logging, and configuration operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors while constructing a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("answer must be one or more lowercase letters a-z, got {answer:?}")]
    InvalidAnswer { answer: String },
}

/// Errors while loading the puzzle file
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("failed to read puzzle file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed puzzle record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Errors inside the detached outcome writer
#[derive(Debug, Error)]
pub enum OutcomeLogError {
    #[error("failed to open outcome log {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to outcome log {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read outcome log {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unparseable outcome line: {line:?}")]
    Parse { line: String },
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}
