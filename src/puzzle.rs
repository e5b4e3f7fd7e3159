//! Puzzle source
//!
//! Reads `question|answer` records, one per line, and picks one at random.
//! Anything unusable falls back to a fixed default puzzle so a round can
//! always start.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::PuzzleError;

pub const DEFAULT_QUESTION: &str = "Large gray animal?";
pub const DEFAULT_ANSWER: &str = "elephant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub question: String,
    pub answer: String,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            answer: DEFAULT_ANSWER.to_string(),
        }
    }
}

/// Parses one `question|answer` record. `line` is 1-based for error messages.
///
/// The answer is trimmed and lowercased and must then be letters `a`..=`z`.
pub fn parse_record(line: usize, text: &str) -> Result<Puzzle, PuzzleError> {
    let (question, answer) = text.split_once('|').ok_or_else(|| PuzzleError::Malformed {
        line,
        reason: "missing '|' between question and answer".to_string(),
    })?;

    let answer = answer.trim().to_lowercase();
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(PuzzleError::Malformed {
            line,
            reason: format!("answer {answer:?} is not a single word of letters a-z"),
        });
    }

    Ok(Puzzle {
        question: question.trim().to_string(),
        answer,
    })
}

/// Raw records of a puzzle file, blank lines dropped
#[derive(Debug, Clone, Default)]
pub struct PuzzleBook {
    /// (1-based line number, text)
    lines: Vec<(usize, String)>,
}

impl PuzzleBook {
    pub fn load(path: &Path) -> Result<Self, PuzzleError> {
        let text = std::fs::read_to_string(path).map_err(|source| PuzzleError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| (i + 1, l.to_string()))
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Picks a record uniformly at random; falls back to the default puzzle
    /// if the book is empty or the picked record is malformed.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Puzzle {
        let Some((line, text)) = self.lines.choose(rng) else {
            tracing::warn!("no puzzles available, using default");
            return Puzzle::default();
        };

        parse_record(*line, text).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "using default puzzle");
            Puzzle::default()
        })
    }
}

/// Loads `path` and picks a puzzle, falling back to the default on any error.
pub fn pick_puzzle(path: &Path) -> Puzzle {
    match PuzzleBook::load(path) {
        Ok(book) => book.choose(&mut rand::thread_rng()),
        Err(err) => {
            tracing::warn!(error = %err, "using default puzzle");
            Puzzle::default()
        }
    }
}
