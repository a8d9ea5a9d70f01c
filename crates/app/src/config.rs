//! Layered configuration: CLI flags > environment > config file > defaults.
//!
//! Flags and environment variables are merged by clap (`env = ...`); this
//! module fills whatever is still unset from `quiz.toml` and the defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use quiz_core::model::{AnswerKeyPolicy, CategoryFilter};
use quiz_core::scoring::{
    DEFAULT_SECONDS_PER_QUESTION, DEFAULT_TOLERANCE_SECS, ScoringPolicy, ScoringPolicyError,
};
use storage::{BankLocation, StorageError};

use crate::cli::RunArgs;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "quiz.toml";

/// Bank used when nothing else is configured.
pub const DEFAULT_BANK: &str = "preguntas.json";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("question count must be at least 1")]
    InvalidCount,
    #[error(transparent)]
    Scoring(#[from] ScoringPolicyError),
    #[error(transparent)]
    Location(#[from] StorageError),
}

/// Contents of `quiz.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bank: Option<String>,
    pub count: Option<usize>,
    pub category: Option<String>,
    pub seconds_per_question: Option<u32>,
    pub tolerance_secs: Option<u32>,
    pub answer_key: Option<AnswerKeyPolicy>,
    pub seed: Option<u64>,
}

/// Load the config file.
///
/// An explicit path must exist; the default `quiz.toml` is optional.
///
/// # Errors
///
/// Returns `ConfigError::Read` or `ConfigError::Parse` for unreadable or malformed files.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if explicit.is_none() && err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bank: BankLocation,
    pub answer_key: AnswerKeyPolicy,
    pub scoring: ScoringPolicy,
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub category: Option<CategoryFilter>,
}

impl Settings {
    /// Merge CLI/env values over the file config and defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero count, a zero time budget or a blank bank location.
    pub fn resolve(args: &RunArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let raw_bank = args
            .bank
            .bank
            .clone()
            .or(file.bank)
            .unwrap_or_else(|| DEFAULT_BANK.to_string());
        let bank = BankLocation::parse(&raw_bank)?;

        let answer_key = if args.bank.strict_answer_key {
            AnswerKeyPolicy::Strict
        } else {
            file.answer_key.unwrap_or_default()
        };

        let scoring = ScoringPolicy::new(
            args.seconds_per_question
                .or(file.seconds_per_question)
                .unwrap_or(DEFAULT_SECONDS_PER_QUESTION),
            args.tolerance
                .or(file.tolerance_secs)
                .unwrap_or(DEFAULT_TOLERANCE_SECS),
        )?;

        let count = args.count.or(file.count);
        if count == Some(0) {
            return Err(ConfigError::InvalidCount);
        }

        let category = args
            .category
            .clone()
            .or(file.category)
            .map(|raw| {
                let Ok(filter) = raw.parse::<CategoryFilter>();
                filter
            });

        Ok(Self {
            bank,
            answer_key,
            scoring,
            seed: args.seed.or(file.seed),
            count,
            category,
        })
    }
}
