use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::http::HttpQuestionSource;
use crate::json::JsonFileSource;

/// Errors surfaced by question bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("invalid question record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("invalid bank location: {0}")]
    InvalidLocation(String),
}

/// Read-only contract for fetching the full question bank.
///
/// Implementations return validated domain questions whose ids are their
/// positions in the source.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every question in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the resource is missing, or other
    /// errors for transport, decoding or record validation failures.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Human-readable location for logs and messages.
    fn describe(&self) -> String;
}

/// Where a question bank lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankLocation {
    File(PathBuf),
    Http(Url),
}

impl BankLocation {
    /// Interpret `raw` as an `http(s)` URL, a `file://` URL, or a plain path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidLocation` if `raw` is blank or is a
    /// `file://` URL that does not map to a local path.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StorageError::InvalidLocation("empty location".into()));
        }

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Http(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| StorageError::InvalidLocation(trimmed.to_string())),
            // Anything else (relative paths, Windows drive letters) is a path.
            _ => Ok(Self::File(PathBuf::from(trimmed))),
        }
    }
}

/// Simple in-memory source for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    questions: Arc<Vec<Question>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(questions),
        }
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        Ok(self.questions.as_ref().clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} questions)", self.questions.len())
    }
}

/// Holds the configured question source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(InMemoryQuestionSource::new(questions)),
        }
    }

    /// Build the source matching `location`.
    #[must_use]
    pub fn from_location(location: &BankLocation) -> Self {
        let questions: Arc<dyn QuestionSource> = match location {
            BankLocation::File(path) => Arc::new(JsonFileSource::new(path.clone())),
            BankLocation::Http(url) => Arc::new(HttpQuestionSource::new(url.clone())),
        };
        Self { questions }
    }
}
