//! Outcome log
//!
//! At the end of a round one line is appended to a plain text log:
//!
//! ```text
//! Result: Win | Word: cat | Question: Small pet that purrs?
//! ```
//!
//! The write is handed off to a detached blocking job. The session never
//! waits for it and never hears about failures; those only reach `tracing`.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::OutcomeLogError;

/// Result column of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Win,
    Lose,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Win => f.write_str("Win"),
            Verdict::Lose => f.write_str("Lose"),
        }
    }
}

impl FromStr for Verdict {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Win" => Ok(Verdict::Win),
            "Lose" => Ok(Verdict::Lose),
            _ => Err(()),
        }
    }
}

/// One finished round, owned outright by whoever writes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub verdict: Verdict,
    pub answer: String,
    pub question: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Result: {} | Word: {} | Question: {}",
            self.verdict, self.answer, self.question
        )
    }
}

impl FromStr for LogRecord {
    type Err = OutcomeLogError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parse_err = || OutcomeLogError::Parse {
            line: line.to_string(),
        };

        // The question is last and may itself contain " | ".
        let mut fields = line.trim_end_matches(['\r', '\n']).splitn(3, " | ");
        let verdict = fields
            .next()
            .and_then(|f| f.strip_prefix("Result: "))
            .and_then(|v| v.parse::<Verdict>().ok())
            .ok_or_else(parse_err)?;
        let answer = fields
            .next()
            .and_then(|f| f.strip_prefix("Word: "))
            .ok_or_else(parse_err)?;
        let question = fields.next().ok_or_else(parse_err)?;
        let question = question
            .strip_prefix("Question: ")
            .or_else(|| (question == "Question:").then_some(""))
            .ok_or_else(parse_err)?;

        Ok(Self {
            verdict,
            answer: answer.to_string(),
            question: question.to_string(),
        })
    }
}

/// Receiver for the single end-of-round record.
///
/// `submit` is called by whichever writer ended the round, after the
/// session lock has been released. It must not block.
pub trait OutcomeSink: Send + Sync {
    fn submit(&self, record: LogRecord);
}

/// Appends records to a file from a detached blocking job
#[derive(Debug, Clone)]
pub struct FileOutcomeLog {
    path: PathBuf,
}

impl FileOutcomeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutcomeSink for FileOutcomeLog {
    fn submit(&self, record: LogRecord) {
        let path = self.path.clone();
        let job = move || {
            if let Err(err) = append_line(&path, &record) {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    source = ?std::error::Error::source(&err),
                    "outcome not logged"
                );
            }
        };

        // Not joined on purpose: the caller moves on immediately.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(job);
            }
            Err(_) => {
                std::thread::spawn(job);
            }
        }
    }
}

/// Appends one record line to `path`, creating the file if needed.
pub fn append_line(path: &Path, record: &LogRecord) -> Result<(), OutcomeLogError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| OutcomeLogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    // Single write so concurrent appenders never interleave within a line.
    let line = format!("{record}\n");
    file.write_all(line.as_bytes())
        .map_err(|source| OutcomeLogError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "outcome logged");
    Ok(())
}

/// Win/loss tally of an outcome log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub records: Vec<LogRecord>,
    /// Non-empty lines that did not parse
    pub skipped: usize,
}

impl History {
    /// Reads the log at `path`. A missing file is an empty history.
    pub fn from_file(path: &Path) -> Result<Self, OutcomeLogError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(OutcomeLogError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut history = Self::default();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match line.parse::<LogRecord>() {
                Ok(record) => history.records.push(record),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping outcome line");
                    history.skipped += 1;
                }
            }
        }
        history
    }

    pub fn wins(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.verdict == Verdict::Win)
            .count()
    }

    pub fn losses(&self) -> usize {
        self.records.len() - self.wins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(verdict: Verdict, answer: &str, question: &str) -> LogRecord {
        LogRecord {
            verdict,
            answer: answer.to_string(),
            question: question.to_string(),
        }
    }

    #[test]
    fn test_line_format() {
        let r = record(Verdict::Lose, "elephant", "Large gray animal?");
        assert_eq!(
            r.to_string(),
            "Result: Lose | Word: elephant | Question: Large gray animal?"
        );
    }

    #[test]
    fn test_parse_line() {
        let r: LogRecord = "Result: Win | Word: cat | Question: Pet?".parse().unwrap();
        assert_eq!(r, record(Verdict::Win, "cat", "Pet?"));
    }

    #[test]
    fn test_parse_keeps_pipes_in_question() {
        let original = record(Verdict::Win, "or", "this | that?");
        let parsed: LogRecord = original.to_string().parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_empty_question() {
        let original = record(Verdict::Lose, "dog", "");
        let parsed: LogRecord = original.to_string().parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for line in [
            "",
            "Result: Draw | Word: cat | Question: q",
            "Result: Win | cat | Question: q",
            "Result: Win | Word: cat",
            "hello world",
        ] {
            assert!(line.parse::<LogRecord>().is_err(), "{line:?}");
        }
    }

    #[test]
    fn test_history_tally() {
        let text = "\
Result: Win | Word: cat | Question: Pet?
Result: Lose | Word: dog | Question: Barks?

garbage line
Result: Win | Word: ox | Question: Yoked?
";
        let history = History::parse(text);
        assert_eq!(history.wins(), 2);
        assert_eq!(history.losses(), 1);
        assert_eq!(history.skipped, 1);
    }

    #[test]
    fn test_history_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::from_file(&dir.path().join("nope.txt")).unwrap();
        assert_eq!(history, History::default());
    }

    #[test]
    fn test_append_line_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_log.txt");
        append_line(&path, &record(Verdict::Win, "cat", "Pet?")).unwrap();
        append_line(&path, &record(Verdict::Lose, "dog", "Barks?")).unwrap();

        let history = History::from_file(&path).unwrap();
        assert_eq!(history.records.len(), 2);
        assert_eq!(history.records[1].answer, "dog");
    }

    #[test]
    fn test_append_line_reports_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let err = append_line(dir.path(), &record(Verdict::Win, "cat", "q")).unwrap_err();
        assert!(matches!(err, OutcomeLogError::Open { .. }));
    }

    #[tokio::test]
    async fn test_file_sink_writes_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_log.txt");
        let sink = FileOutcomeLog::new(&path);
        sink.submit(record(Verdict::Win, "cat", "Pet?"));

        let mut history = History::default();
        for _ in 0..200 {
            history = History::from_file(&path).unwrap();
            if !history.records.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(history.records, vec![record(Verdict::Win, "cat", "Pet?")]);
    }

    #[tokio::test]
    async fn test_file_sink_failure_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileOutcomeLog::new(dir.path());
        sink.submit(record(Verdict::Lose, "dog", "q"));
        // Give the blocking job time to fail; nothing should surface here.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[test]
    fn test_file_sink_outside_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_log.txt");
        FileOutcomeLog::new(&path).submit(record(Verdict::Lose, "dog", "q"));

        let mut found = false;
        for _ in 0..200 {
            if History::from_file(&path).unwrap().records.len() == 1 {
                found = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(found);
    }
}
