//! Application configuration
//!
//! Persisted with `confy` under the `hangman` app name. Command-line flags
//! override individual fields for a single run.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::{MAX_TRIES, ROUND_SECS, SessionOptions};

const APP_NAME: &str = "hangman";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// `question|answer` records, one per line
    #[serde(default = "default_word_file")]
    pub word_file: PathBuf,
    /// Append-only outcome log
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_round_secs")]
    pub round_secs: u32,
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
}

fn default_word_file() -> PathBuf {
    PathBuf::from("words.txt")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("game_log.txt")
}

fn default_round_secs() -> u32 {
    ROUND_SECS
}

fn default_max_tries() -> u32 {
    MAX_TRIES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            word_file: default_word_file(),
            log_file: default_log_file(),
            round_secs: default_round_secs(),
            max_tries: default_max_tries(),
        }
    }
}

impl AppConfig {
    pub fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    /// Loads the stored config, falling back to defaults if it is unreadable.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "using default configuration");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            // Zero of either would end the round before it starts.
            max_tries: self.max_tries.max(1),
            round_secs: self.round_secs.max(1),
            tick: Duration::from_secs(1),
        }
    }
}
