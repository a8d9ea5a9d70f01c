use thiserror::Error;

use services::{QuizError, SelectionError, SessionError};

/// Failures that end a presenter run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PresenterError {
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing text for a rejected action.
#[must_use]
pub fn user_message(err: &QuizError) -> String {
    match err {
        QuizError::BankUnavailable => "The question bank could not be loaded.".to_string(),
        QuizError::Bank(err) => format!("Could not load the question bank: {err}"),
        QuizError::Selection(err) => selection_message(err),
        QuizError::Session(err) => session_message(err),
        other => other.to_string(),
    }
}

fn selection_message(err: &SelectionError) -> String {
    match err {
        SelectionError::InvalidCount => "Enter a valid number of questions (minimum 1).".to_string(),
        SelectionError::EmptyCategory { category } => {
            format!("There are no questions in category \"{category}\".")
        }
        SelectionError::InsufficientPool {
            available,
            category: Some(category),
            ..
        } => format!("There are only {available} questions in category \"{category}\"."),
        SelectionError::InsufficientPool { available, .. } => {
            format!("There are only {available} questions in the bank.")
        }
        other => other.to_string(),
    }
}

fn session_message(err: &SessionError) -> String {
    match err {
        SessionError::OutOfRange { len, .. } => {
            format!("Pick a question between 1 and {len}.")
        }
        SessionError::InvalidOption { options, .. } => {
            format!("Pick an option between 1 and {options}.")
        }
        SessionError::NotInProgress => "No exam is running.".to_string(),
        other => other.to_string(),
    }
}
