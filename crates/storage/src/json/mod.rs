use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Question;

use crate::repository::{QuestionSource, StorageError};

mod mapping;

pub use mapping::{OptionRecord, QuestionRecord, parse_questions};

/// Question bank stored as a JSON array in a local file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Io(e.to_string()),
            })?;
        let questions = parse_questions(&contents)?;
        tracing::debug!(
            path = %self.path.display(),
            questions = questions.len(),
            "decoded question bank file"
        );
        Ok(questions)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
