//! Text rendering of a session snapshot for the terminal front end

use std::fmt::Write;

use crate::session::{Outcome, Snapshot};

/// Time left at which the clock is flagged as running out
const LOW_TIME: u32 = 10;

const GALLOWS: [&str; 7] = [
    "  +---+\n  |   |\n      |\n      |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n      |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n  |   |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|   |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n /    |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n / \\  |\n=======",
];

/// Gallows drawing scaled to how many of the allowed misses are used.
pub fn gallows(incorrect: u32, max_tries: u32) -> &'static str {
    let last = GALLOWS.len() - 1;
    let stage = if max_tries == 0 {
        last
    } else {
        (incorrect.min(max_tries) as usize * last).div_ceil(max_tries as usize)
    };
    GALLOWS[stage.min(last)]
}

pub fn frame(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Question: {}", snapshot.question);
    let _ = writeln!(out, "{}", gallows(snapshot.incorrect_count, snapshot.max_tries));
    let _ = writeln!(out, "Word: {}", snapshot.display_word);
    let _ = writeln!(
        out,
        "Tries: {}/{}",
        snapshot.incorrect_count, snapshot.max_tries
    );
    let _ = writeln!(out, "Guessed Letters: {}", snapshot.guessed_letters);

    match snapshot.outcome {
        Outcome::Pending => {
            let hurry = if snapshot.time_remaining <= LOW_TIME { " (hurry!)" } else { "" };
            let _ = writeln!(out, "Time Left: {}{hurry}", snapshot.time_remaining);
            let _ = writeln!(out, "Type a letter (a-z) to guess");
        }
        Outcome::Won => {
            let _ = writeln!(out, "You won!");
        }
        Outcome::Lost => {
            let answer = snapshot.revealed_answer.as_deref().unwrap_or_default();
            let _ = writeln!(out, "You lost! The word was: {answer}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(outcome: Outcome) -> Snapshot {
        Snapshot {
            question: "Pet?".to_string(),
            display_word: "c _ t".to_string(),
            guessed_letters: "ctx".to_string(),
            incorrect_count: 1,
            max_tries: 6,
            time_remaining: 8,
            outcome,
            revealed_answer: outcome.is_terminal().then(|| "cat".to_string()),
        }
    }

    #[test]
    fn test_gallows_stages() {
        assert_eq!(gallows(0, 6), GALLOWS[0]);
        assert_eq!(gallows(3, 6), GALLOWS[3]);
        assert_eq!(gallows(6, 6), GALLOWS[6]);
        assert_eq!(gallows(9, 6), GALLOWS[6]);
        // Fewer tries still ends on the full figure.
        assert_eq!(gallows(1, 2), GALLOWS[3]);
        assert_eq!(gallows(2, 2), GALLOWS[6]);
    }

    #[test]
    fn test_frame_pending() {
        let text = frame(&snapshot(Outcome::Pending));
        assert!(text.contains("Word: c _ t"));
        assert!(text.contains("Tries: 1/6"));
        assert!(text.contains("Time Left: 8 (hurry!)"));
        assert!(!text.contains("cat"));
    }

    #[test]
    fn test_frame_lost_reveals_answer() {
        let text = frame(&snapshot(Outcome::Lost));
        assert!(text.contains("You lost! The word was: cat"));
        assert!(!text.contains("Time Left"));
    }

    #[test]
    fn test_frame_won() {
        assert!(frame(&snapshot(Outcome::Won)).contains("You won!"));
    }
}
