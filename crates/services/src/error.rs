//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionBankError;
use storage::StorageError;

/// Errors emitted while loading the question bank (the load error of a run).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("could not load question bank from {location}: {source}")]
    Load {
        location: String,
        #[source]
        source: StorageError,
    },
    #[error(transparent)]
    Validation(#[from] QuestionBankError),
}

/// Errors emitted while choosing questions for an attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("enter a valid number of questions (minimum 1)")]
    InvalidCount,
    #[error("no questions in category \"{category}\"")]
    EmptyCategory { category: String },
    #[error("only {available} questions available, {requested} requested")]
    InsufficientPool {
        requested: usize,
        available: usize,
        category: Option<String>,
    },
}

/// Errors emitted by the session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions selected for session")]
    Empty,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session is not in progress")]
    NotInProgress,
    #[error("position {position} is out of range for {len} questions")]
    OutOfRange { position: usize, len: usize },
    #[error("option {index} does not exist ({options} options)")]
    InvalidOption { index: usize, options: usize },
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question bank is not loaded")]
    BankUnavailable,
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
