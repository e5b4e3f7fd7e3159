use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hangman::config::AppConfig;
use hangman::outcome_log::History;
use hangman::{FileOutcomeLog, GuessOutcome, SessionHandle, Snapshot, logging, puzzle, render};
use tokio::sync::mpsc;

/// Redraw period while waiting for input
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(version, about = "Hangman against the clock")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round (the default)
    Play(PlayArgs),
    /// Save the given settings as the defaults for later rounds
    Config(PlayArgs),
    /// Show the win/loss tally from the outcome log
    History {
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// `question|answer` file
    #[arg(short, long)]
    words: Option<PathBuf>,
    /// Outcome log to append to
    #[arg(short, long)]
    log: Option<PathBuf>,
    #[arg(long)]
    round_secs: Option<u32>,
    #[arg(long)]
    max_tries: Option<u32>,
}

impl PlayArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(words) = self.words {
            config.word_file = words;
        }
        if let Some(log) = self.log {
            config.log_file = log;
        }
        if let Some(secs) = self.round_secs {
            config.round_secs = secs;
        }
        if let Some(tries) = self.max_tries {
            config.max_tries = tries;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    match cli.command {
        Some(Commands::History { log }) => {
            let path = log.unwrap_or(config.log_file);
            let history = History::from_file(&path).map_err(|e| e.to_string())?;
            println!(
                "{} games: {} won, {} lost",
                history.records.len(),
                history.wins(),
                history.losses()
            );
            if history.skipped > 0 {
                println!("({} unreadable lines skipped)", history.skipped);
            }
            Ok(())
        }
        Some(Commands::Config(args)) => {
            args.apply(&mut config);
            config.save().map_err(|e| e.to_string())?;
            println!("{config:#?}");
            Ok(())
        }
        Some(Commands::Play(args)) => {
            args.apply(&mut config);
            play(config).await
        }
        None => play(config).await,
    }
}

async fn play(config: AppConfig) -> Result<(), String> {
    let puzzle = puzzle::pick_puzzle(&config.word_file);
    let sink = Arc::new(FileOutcomeLog::new(&config.log_file));
    let session = SessionHandle::with_options(
        &puzzle.question,
        &puzzle.answer,
        config.session_options(),
        sink,
    )
    .map_err(|e| e.to_string())?;

    let mut input = spawn_stdin_reader();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown: Option<Snapshot> = None;
    let mut notice: Option<String> = None;

    loop {
        tokio::select! {
            line = input.recv() => match line {
                Some(line) => {
                    for letter in line.trim().chars() {
                        let result = session.apply_guess(letter);
                        if result != GuessOutcome::Accepted {
                            notice = Some(format!("'{letter}': {result}"));
                        }
                    }
                }
                None => break,
            },
            _ = redraw.tick() => {}
            _ = &mut ctrl_c => break,
        }

        let snapshot = session.snapshot();
        if shown.as_ref() != Some(&snapshot) || notice.is_some() {
            draw(&snapshot, notice.take())?;
            shown = Some(snapshot);
        }
        if shown.as_ref().is_some_and(Snapshot::ended) {
            break;
        }
    }

    let (_, last) = session.shutdown().await;
    if shown.as_ref() != Some(&last) {
        draw(&last, None)?;
    }
    Ok(())
}

fn draw(snapshot: &Snapshot, notice: Option<String>) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "\n{}", render::frame(snapshot)).map_err(|e| e.to_string())?;
    if let Some(notice) = notice {
        writeln!(stdout, "{notice}").map_err(|e| e.to_string())?;
    }
    stdout.flush().map_err(|e| e.to_string())
}

/// Reads stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
